//! Lexer for grammar files.
//!
//! Produces span-based tokens without storing text. Trivia is kept in the
//! stream so the header scanner and the parser can decide what to skip.
//!
//! Action blocks `{ ... }` are lexed as a single token: the callback scans
//! forward to the matching brace, skipping quoted text. An unbalanced block
//! becomes `Garbage`, like any other unrecognized input.

use std::ops::Range;

use logos::Logos;
use rowan::TextRange;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("grammar")]
    KwGrammar,

    #[token("lexer")]
    KwLexer,

    #[token("parser")]
    KwParser,

    #[token("tree")]
    KwTree,

    #[token("import")]
    KwImport,

    #[token("fragment")]
    KwFragment,

    #[token("public")]
    #[token("protected")]
    #[token("private")]
    Modifier,

    /// `options {`, opening an option list.
    #[regex(r"options[ \t\r\n]*\{")]
    OptionsOpen,

    /// `tokens {`, opening a token declaration list.
    #[regex(r"tokens[ \t\r\n]*\{")]
    TokensOpen,

    #[token("{", action_body)]
    Action,

    #[token("}")]
    BraceClose,

    #[token("@")]
    At,

    #[token("::")]
    DoubleColon,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token("|")]
    Pipe,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("?")]
    Question,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("=")]
    Equals,

    #[token(",")]
    Comma,

    #[token("..")]
    DotDot,

    #[token(".")]
    Dot,

    #[token("~")]
    Tilde,

    /// Uppercase identifier: token names, lexer rules, grammar names.
    /// Defined after keywords so they take precedence.
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    TokenRef,

    /// Lowercase identifier: parser rules, option names.
    #[regex(r"[a-z][a-zA-Z0-9_]*")]
    RuleRef,

    #[regex(r"'(?:[^'\\]|\\.)*'")]
    CharLiteral,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    StringLiteral,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
}

impl TokenKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::LineComment | Self::BlockComment)
    }

    /// Tokens usable where a name is expected.
    #[inline]
    pub fn is_identifier(self) -> bool {
        matches!(self, Self::TokenRef | Self::RuleRef)
    }
}

/// Consume up to and including the brace matching the one just lexed.
fn action_body(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    let rest = lex.remainder();
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    lex.bump(i + 1);
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

pub(crate) fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Consecutive lexer errors are coalesced into single `Garbage` tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(TokenKind::Garbage, range_to_text_range(start..end)));
                }
                tokens.push(Token::new(kind, range_to_text_range(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        TokenKind::Garbage,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[Range::<usize>::from(token.span)]
}
