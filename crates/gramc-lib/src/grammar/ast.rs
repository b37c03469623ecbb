//! Grammar syntax tree.

use gramc_core::GrammarKind;
use indexmap::IndexMap;
use rowan::TextRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarAst {
    pub kind: GrammarKind,
    pub name: String,
    pub name_span: TextRange,
    /// Option values keep their source spelling, quotes included.
    pub options: IndexMap<String, String>,
    pub imports: Vec<Import>,
    pub tokens: Vec<TokenSpec>,
    pub actions: Vec<NamedAction>,
    pub rules: Vec<Rule>,
}

impl GrammarAst {
    /// Option value with surrounding quotes removed.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(|v| unquote(v))
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn lexer_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.is_lexer_rule())
    }

    pub fn parser_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| !r.is_lexer_rule())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    pub span: TextRange,
}

/// Entry of a `tokens { ... }` section: `NAME;` or `NAME = 'literal';`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub name: String,
    pub literal: Option<String>,
    pub span: TextRange,
}

/// `@name { ... }` or `@scope::name { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAction {
    pub scope: Option<String>,
    pub name: String,
    /// Body including the braces.
    pub text: String,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub name_span: TextRange,
    /// Whole rule, modifier through `;`.
    pub span: TextRange,
    pub modifier: Option<String>,
    pub fragment: bool,
    pub block: Block,
}

impl Rule {
    /// Lexer rules are the ones whose name starts uppercase.
    pub fn is_lexer_rule(&self) -> bool {
        self.name.starts_with(|c: char| c.is_ascii_uppercase())
    }

    /// The literal of a rule consisting of exactly one literal, like `PLUS : '+' ;`.
    pub fn single_literal(&self) -> Option<&str> {
        let [alt] = self.block.alternatives.as_slice() else {
            return None;
        };
        match alt.elements.as_slice() {
            [Element {
                atom: Atom::Literal(lit),
                suffix: Suffix::None,
                ..
            }] => Some(lit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub alternatives: Vec<Alternative>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub elements: Vec<Element>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub atom: Atom,
    pub suffix: Suffix,
    pub span: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    None,
    Optional,
    Star,
    Plus,
}

impl Suffix {
    pub fn as_str(self) -> &'static str {
        match self {
            Suffix::None => "",
            Suffix::Optional => "?",
            Suffix::Star => "*",
            Suffix::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    RuleRef(String),
    TokenRef(String),
    /// Quoted literal, quotes included.
    Literal(String),
    /// `'a'..'z'`, quotes included.
    Range(String, String),
    Wildcard,
    Not(Box<Atom>),
    Block(Block),
    /// Inline action, braces included.
    Action(String),
}

/// Strip one pair of matching quotes.
pub fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Characters denoted by a quoted literal, with escapes resolved.
pub fn literal_chars(literal: &str) -> Vec<char> {
    let mut out = Vec::new();
    let mut chars = unquote(literal).chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.extend(hex.chars()),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
