//! Recursive descent parser producing [`GrammarAst`].
//!
//! The header (`grammar Name;`) must parse or nothing else is attempted. A
//! malformed rule is reported and skipped up to its `;`, so one run reports
//! every broken rule.

use gramc_core::GrammarKind;
use indexmap::IndexMap;
use rowan::{TextRange, TextSize};

use super::ast::{
    Alternative, Atom, Block, Element, GrammarAst, Import, NamedAction, Rule, Suffix, TokenSpec,
};
use super::syntax::{Token, TokenKind, lex, token_text};
use crate::pipeline::Problem;

/// Marker for an error that was already recorded.
struct Recover;

type PResult<T> = Result<T, Recover>;

pub fn parse(source: &str, file: &str) -> Result<GrammarAst, Vec<Problem>> {
    let tokens = lex(source)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();
    let mut parser = Parser {
        source,
        file,
        tokens,
        pos: 0,
        problems: Vec::new(),
    };

    let ast = parser.parse_grammar();
    match ast {
        Some(ast) if parser.problems.is_empty() => Ok(ast),
        _ => Err(parser.problems),
    }
}

struct Parser<'s> {
    source: &'s str,
    file: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    problems: Vec<Problem>,
}

impl<'s> Parser<'s> {
    fn parse_grammar(&mut self) -> Option<GrammarAst> {
        let (kind, name, name_span) = self.parse_header().ok()?;
        let mut ast = GrammarAst {
            kind,
            name,
            name_span,
            options: IndexMap::new(),
            imports: Vec::new(),
            tokens: Vec::new(),
            actions: Vec::new(),
            rules: Vec::new(),
        };

        loop {
            let result = match self.current() {
                Some(TokenKind::OptionsOpen) => self.parse_options(&mut ast.options),
                Some(TokenKind::KwImport) => self.parse_imports(&mut ast.imports),
                Some(TokenKind::TokensOpen) => self.parse_tokens(&mut ast.tokens),
                Some(TokenKind::At) => self.parse_named_action().map(|a| ast.actions.push(a)),
                _ => break,
            };
            if result.is_err() {
                self.recover();
            }
        }

        while self.current().is_some() {
            match self.parse_rule() {
                Ok(rule) => ast.rules.push(rule),
                Err(Recover) => self.recover(),
            }
        }

        Some(ast)
    }

    fn parse_header(&mut self) -> PResult<(GrammarKind, String, TextRange)> {
        let keyword = match self.current() {
            Some(TokenKind::KwLexer) => Some("lexer"),
            Some(TokenKind::KwParser) => Some("parser"),
            Some(TokenKind::KwTree) => Some("tree"),
            _ => None,
        };
        if keyword.is_some() {
            self.bump();
        }
        let kind = GrammarKind::from_keyword(keyword).unwrap_or_default();

        self.expect(TokenKind::KwGrammar, "`grammar`")?;
        let name = self.expect_identifier("grammar name")?;
        self.expect(TokenKind::Semicolon, "`;`")?;
        Ok((kind, self.text(&name).to_string(), name.span))
    }

    fn parse_options(&mut self, options: &mut IndexMap<String, String>) -> PResult<()> {
        self.bump();
        while !self.at(TokenKind::BraceClose) {
            let name = self.expect_identifier("option name")?;
            self.expect(TokenKind::Equals, "`=`")?;
            let value = match self.current() {
                Some(
                    TokenKind::TokenRef
                    | TokenKind::RuleRef
                    | TokenKind::CharLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::Int,
                ) => self.bump(),
                _ => return self.error_here("expected option value"),
            };
            self.expect(TokenKind::Semicolon, "`;`")?;
            options.insert(self.text(&name).to_string(), self.text(&value).to_string());
        }
        self.bump();
        Ok(())
    }

    fn parse_imports(&mut self, imports: &mut Vec<Import>) -> PResult<()> {
        self.bump();
        loop {
            let name = self.expect_identifier("grammar name")?;
            imports.push(Import {
                name: self.text(&name).to_string(),
                span: name.span,
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "`;`")?;
        Ok(())
    }

    fn parse_tokens(&mut self, tokens: &mut Vec<TokenSpec>) -> PResult<()> {
        self.bump();
        while !self.at(TokenKind::BraceClose) {
            let name = self.expect(TokenKind::TokenRef, "token name")?;
            let literal = if self.eat(TokenKind::Equals).is_some() {
                match self.current() {
                    Some(TokenKind::CharLiteral | TokenKind::StringLiteral) => {
                        let lit = self.bump();
                        Some(self.text(&lit).to_string())
                    }
                    _ => return self.error_here("expected literal"),
                }
            } else {
                None
            };
            let end = self.expect(TokenKind::Semicolon, "`;`")?;
            tokens.push(TokenSpec {
                name: self.text(&name).to_string(),
                literal,
                span: name.span.cover(end.span),
            });
        }
        self.bump();
        Ok(())
    }

    fn parse_named_action(&mut self) -> PResult<NamedAction> {
        let at = self.bump();
        let first = match self.current() {
            Some(TokenKind::KwLexer | TokenKind::KwParser) => self.bump(),
            _ => self.expect_identifier("action name")?,
        };
        let (scope, name) = if self.eat(TokenKind::DoubleColon).is_some() {
            let name = self.expect_identifier("action name")?;
            (Some(self.text(&first).to_string()), name)
        } else {
            (None, first)
        };
        let body = self.expect(TokenKind::Action, "action block")?;
        Ok(NamedAction {
            scope,
            name: self.text(&name).to_string(),
            text: self.text(&body).to_string(),
            span: at.span.cover(body.span),
        })
    }

    fn parse_rule(&mut self) -> PResult<Rule> {
        let start = self.current_span();
        let mut modifier = None;
        let mut fragment = false;
        loop {
            match self.current() {
                Some(TokenKind::Modifier) => {
                    let tok = self.bump();
                    modifier = Some(self.text(&tok).to_string());
                }
                Some(TokenKind::KwFragment) => {
                    self.bump();
                    fragment = true;
                }
                _ => break,
            }
        }

        let name = self.expect_identifier("rule name")?;
        self.expect(TokenKind::Colon, "`:`")?;
        let block = self.parse_block()?;
        let end = self.expect(TokenKind::Semicolon, "`;` at end of rule")?;

        Ok(Rule {
            name: self.text(&name).to_string(),
            name_span: name.span,
            span: start.cover(end.span),
            modifier,
            fragment,
            block,
        })
    }

    fn parse_block(&mut self) -> PResult<Block> {
        let mut alternatives = vec![self.parse_alternative()?];
        while self.eat(TokenKind::Pipe).is_some() {
            alternatives.push(self.parse_alternative()?);
        }
        let span = alternatives
            .iter()
            .map(|a| a.span)
            .reduce(TextRange::cover)
            .unwrap_or_else(|| TextRange::empty(self.current_span().start()));
        Ok(Block { alternatives, span })
    }

    fn parse_alternative(&mut self) -> PResult<Alternative> {
        let mut elements = Vec::new();
        loop {
            match self.current() {
                None
                | Some(TokenKind::Pipe | TokenKind::Semicolon | TokenKind::ParenClose) => break,
                _ => elements.push(self.parse_element()?),
            }
        }
        let span = elements
            .iter()
            .map(|e| e.span)
            .reduce(TextRange::cover)
            .unwrap_or_else(|| TextRange::empty(self.current_span().start()));
        Ok(Alternative { elements, span })
    }

    fn parse_element(&mut self) -> PResult<Element> {
        let start = self.current_span();
        let atom = self.parse_atom()?;

        if matches!(atom, Atom::Action(_)) {
            // `{...}?` is a semantic predicate; it matches no input either way.
            self.eat(TokenKind::Question);
            return Ok(Element {
                atom,
                suffix: Suffix::None,
                span: start.cover(self.previous_span()),
            });
        }

        let suffix = match self.current() {
            Some(TokenKind::Question) => Suffix::Optional,
            Some(TokenKind::Star) => Suffix::Star,
            Some(TokenKind::Plus) => Suffix::Plus,
            _ => Suffix::None,
        };
        if suffix != Suffix::None {
            self.bump();
        }
        Ok(Element {
            atom,
            suffix,
            span: start.cover(self.previous_span()),
        })
    }

    fn parse_atom(&mut self) -> PResult<Atom> {
        match self.current() {
            Some(TokenKind::RuleRef) => {
                let tok = self.bump();
                Ok(Atom::RuleRef(self.text(&tok).to_string()))
            }
            Some(TokenKind::TokenRef) => {
                let tok = self.bump();
                Ok(Atom::TokenRef(self.text(&tok).to_string()))
            }
            Some(TokenKind::CharLiteral | TokenKind::StringLiteral) => {
                let tok = self.bump();
                let lit = self.text(&tok).to_string();
                if self.eat(TokenKind::DotDot).is_none() {
                    return Ok(Atom::Literal(lit));
                }
                let hi = self.expect(TokenKind::CharLiteral, "character literal")?;
                Ok(Atom::Range(lit, self.text(&hi).to_string()))
            }
            Some(TokenKind::Dot) => {
                self.bump();
                Ok(Atom::Wildcard)
            }
            Some(TokenKind::Tilde) => {
                self.bump();
                Ok(Atom::Not(Box::new(self.parse_atom()?)))
            }
            Some(TokenKind::ParenOpen) => {
                self.bump();
                let block = self.parse_block()?;
                self.expect(TokenKind::ParenClose, "`)`")?;
                Ok(Atom::Block(block))
            }
            Some(TokenKind::Action) => {
                let tok = self.bump();
                Ok(Atom::Action(self.text(&tok).to_string()))
            }
            _ => self.error_here("expected a rule element"),
        }
    }

    fn current(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    fn current_span(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    fn previous_span(&self) -> TextRange {
        self.pos
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .map_or_else(|| TextRange::empty(0.into()), |t| t.span)
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    /// Callers check `current()` first; at end of input this yields an empty `Garbage` token.
    fn bump(&mut self) -> Token {
        match self.tokens.get(self.pos) {
            Some(&tok) => {
                self.pos += 1;
                tok
            }
            None => Token::new(TokenKind::Garbage, TextRange::empty(self.eof_offset())),
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.at(kind).then(|| self.bump())
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        match self.eat(kind) {
            Some(tok) => Ok(tok),
            None => self.error_here(&format!("expected {what}")),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> PResult<Token> {
        match self.current() {
            Some(kind) if kind.is_identifier() => Ok(self.bump()),
            _ => self.error_here(&format!("expected {what}")),
        }
    }

    fn error_here<T>(&mut self, message: &str) -> PResult<T> {
        let span = self.current_span();
        let found = match self.tokens.get(self.pos) {
            None => "end of file".to_string(),
            Some(t) if t.kind == TokenKind::Garbage => {
                format!("unexpected characters `{}`", token_text(self.source, t))
            }
            Some(t) => format!("`{}`", token_text(self.source, t)),
        };
        self.problems.push(Problem {
            file: self.file.to_string(),
            range: span,
            message: format!("{message}, found {found}"),
        });
        Err(Recover)
    }

    /// Skip past the next `;`, or to the end of input.
    fn recover(&mut self) {
        while let Some(kind) = self.current() {
            self.bump();
            if kind == TokenKind::Semicolon {
                break;
            }
        }
    }

    fn text(&self, token: &Token) -> &'s str {
        token_text(self.source, token)
    }
}
