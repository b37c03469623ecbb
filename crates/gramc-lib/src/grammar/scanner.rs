//! Header scanning from the token stream alone.
//!
//! Used to order files and to list build dependencies before anything is
//! compiled, so it never builds a syntax tree. Past the first rule only rule
//! names and literals are looked at.

use std::fs;
use std::path::Path;

use gramc_core::GrammarKind;
use rowan::TextRange;

use super::ast::unquote;
use super::syntax::{Token, TokenKind, lex, token_text};
use crate::pipeline::{FrontendError, GrammarHeader, HeaderScanner, Problem};

#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Self
    }

    /// Header of grammar text; `file` only labels problems.
    pub fn scan_text(&self, text: &str, file: &str) -> Result<GrammarHeader, FrontendError> {
        let tokens: Vec<Token> = lex(text).into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let mut cursor = Cursor { text, tokens: &tokens, pos: 0 };

        let keyword = match cursor.peek() {
            Some(TokenKind::KwLexer) => Some("lexer"),
            Some(TokenKind::KwParser) => Some("parser"),
            Some(TokenKind::KwTree) => Some("tree"),
            _ => None,
        };
        if keyword.is_some() {
            cursor.pos += 1;
        }
        let kind = GrammarKind::from_keyword(keyword).unwrap_or_default();

        let name = match (cursor.next(), cursor.next()) {
            (Some((TokenKind::KwGrammar, _)), Some((k, name))) if k.is_identifier() => name.to_string(),
            _ => {
                return Err(FrontendError::Grammar {
                    problems: vec![Problem {
                        file: file.to_string(),
                        range: cursor.span(),
                        message: "expected grammar header".to_string(),
                    }],
                });
            }
        };

        let mut header = GrammarHeader {
            name,
            kind,
            token_vocab: None,
            imports: Vec::new(),
            language: None,
            lexer_rules: false,
            literals: false,
        };

        // `Some(true)` inside a lexer rule, `None` between rules.
        let mut rule: Option<bool> = None;
        let mut in_rules = false;
        while let Some((kind, _)) = cursor.next() {
            match kind {
                TokenKind::OptionsOpen if !in_rules => cursor.options(&mut header),
                TokenKind::OptionsOpen => cursor.skip_past(TokenKind::BraceClose),
                TokenKind::KwImport if !in_rules => cursor.imports(&mut header),
                TokenKind::KwImport => cursor.skip_past(TokenKind::Semicolon),
                TokenKind::TokensOpen => {
                    if cursor.block_has_literal() {
                        header.literals = true;
                    }
                }
                TokenKind::At => cursor.skip_past(TokenKind::Action),
                TokenKind::Semicolon => rule = None,
                k if k.is_identifier() && rule.is_none() => {
                    let lexer = k == TokenKind::TokenRef;
                    header.lexer_rules |= lexer;
                    rule = Some(lexer);
                    in_rules = true;
                }
                TokenKind::CharLiteral | TokenKind::StringLiteral if rule == Some(false) => {
                    header.literals = true;
                }
                _ => {}
            }
        }
        Ok(header)
    }
}

impl HeaderScanner for Scanner {
    fn scan(&self, path: &Path) -> Result<GrammarHeader, FrontendError> {
        let text = fs::read_to_string(path).map_err(|source| FrontendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_text(&text, &path.display().to_string())
    }
}

struct Cursor<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn next(&mut self) -> Option<(TokenKind, &'a str)> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some((token.kind, token_text(self.text, token)))
    }

    fn span(&self) -> TextRange {
        let at = self.pos.min(self.tokens.len().saturating_sub(1));
        self.tokens
            .get(at)
            .map_or_else(|| TextRange::empty(0.into()), |t| t.span)
    }

    /// `name = value ;` pairs up to the closing brace.
    fn options(&mut self, header: &mut GrammarHeader) {
        while let Some((kind, name)) = self.next() {
            if kind == TokenKind::BraceClose {
                return;
            }
            if self.peek() != Some(TokenKind::Equals) {
                continue;
            }
            self.pos += 1;
            let Some((_, value)) = self.next() else {
                return;
            };
            let value = unquote(value).to_string();
            match name {
                "tokenVocab" => header.token_vocab = Some(value),
                "language" => header.language = Some(value),
                _ => {}
            }
        }
    }

    fn skip_past(&mut self, end: TokenKind) {
        while let Some((kind, _)) = self.next() {
            if kind == end {
                return;
            }
        }
    }

    /// Consumes a `tokens { }` section.
    fn block_has_literal(&mut self) -> bool {
        let mut found = false;
        while let Some((kind, _)) = self.next() {
            match kind {
                TokenKind::BraceClose => break,
                TokenKind::CharLiteral | TokenKind::StringLiteral => found = true,
                _ => {}
            }
        }
        found
    }

    fn imports(&mut self, header: &mut GrammarHeader) {
        while let Some((kind, text)) = self.next() {
            match kind {
                TokenKind::Semicolon => return,
                k if k.is_identifier() => header.imports.push(text.to_string()),
                _ => {}
            }
        }
    }
}
