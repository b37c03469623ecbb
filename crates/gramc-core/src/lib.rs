#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the gramc crates.
//!
//! - [`GrammarKind`]: the four grammar flavours and their file-name suffixes
//! - [`naming`]: fixed derivations for generated file and recognizer names
//! - [`TokenVocabulary`]: token name/literal to token type mapping, with the
//!   `.tokens` on-disk format

pub mod naming;
mod vocab;

#[cfg(test)]
mod naming_tests;

pub use vocab::{TokenVocabulary, VocabError};

/// Extension of generated vocabulary files.
pub const VOCAB_FILE_EXTENSION: &str = ".tokens";

/// Extension of grammar source files.
pub const GRAMMAR_FILE_EXTENSION: &str = ".g";

/// Marker inserted in names of files the tool derives itself.
pub const IMPLICIT_FILE_MARKER: &str = "__";

/// First token type available to user tokens.
///
/// Types below this are reserved: `EOF` is -1 at runtime, `0` is invalid,
/// `1` is end-of-rule, `2`/`3` are tree `DOWN`/`UP`.
pub const MIN_TOKEN_TYPE: u32 = 4;

/// Grammar flavour, from the `[lexer|parser|tree] grammar Name;` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarKind {
    Lexer,
    Parser,
    Tree,
    /// Parser and lexer rules in a single source; compiles into two recognizers.
    #[default]
    Combined,
}

impl GrammarKind {
    /// Kind for a header keyword (`lexer`, `parser`, `tree`), `Combined` when absent.
    pub fn from_keyword(keyword: Option<&str>) -> Option<Self> {
        match keyword {
            None => Some(Self::Combined),
            Some("lexer") => Some(Self::Lexer),
            Some("parser") => Some(Self::Parser),
            Some("tree") => Some(Self::Tree),
            Some(_) => None,
        }
    }

    /// Header keyword, `None` for combined grammars.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Lexer => Some("lexer"),
            Self::Parser => Some("parser"),
            Self::Tree => Some("tree"),
            Self::Combined => None,
        }
    }

    /// Suffix appended to the grammar name to form the recognizer name.
    pub fn recognizer_suffix(self) -> &'static str {
        match self {
            Self::Lexer => "Lexer",
            Self::Parser | Self::Combined => "Parser",
            Self::Tree => "",
        }
    }

    pub fn allows_lexer_rules(self) -> bool {
        matches!(self, Self::Lexer | Self::Combined)
    }

    pub fn allows_parser_rules(self) -> bool {
        !matches!(self, Self::Lexer)
    }
}

impl std::fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexer => write!(f, "lexer"),
            Self::Parser => write!(f, "parser"),
            Self::Tree => write!(f, "tree"),
            Self::Combined => write!(f, "combined"),
        }
    }
}
