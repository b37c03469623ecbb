//! Token vocabulary: token names and literals mapped to token types.
//!
//! The on-disk form is the `.tokens` file, one entry per line:
//!
//! ```text
//! ID=4
//! INT=5
//! T__6=6
//! '+'=6
//! ```
//!
//! Literals keep their quotes so they never collide with token names.

use indexmap::IndexMap;
use serde::Serialize;

use crate::MIN_TOKEN_TYPE;
use crate::naming::literal_token_name;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabError {
    #[error("line {line}: expected `NAME=type`, found `{text}`")]
    MalformedEntry { line: usize, text: String },

    #[error("line {line}: invalid token type `{text}`")]
    InvalidType { line: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenVocabulary {
    names: IndexMap<String, u32>,
    literals: IndexMap<String, u32>,
    max_token_type: u32,
}

impl Default for TokenVocabulary {
    fn default() -> Self {
        Self {
            names: IndexMap::new(),
            literals: IndexMap::new(),
            max_token_type: MIN_TOKEN_TYPE - 1,
        }
    }
}

impl TokenVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type of token `name`, assigning the next free type on first use.
    pub fn define_token(&mut self, name: &str) -> u32 {
        if let Some(&ttype) = self.names.get(name) {
            return ttype;
        }
        let ttype = self.next_type();
        self.names.insert(name.to_owned(), ttype);
        ttype
    }

    /// Type of a quoted literal (`'+'`), assigning a new `T__<n>` token on first use.
    pub fn define_literal(&mut self, literal: &str) -> u32 {
        if let Some(&ttype) = self.literals.get(literal) {
            return ttype;
        }
        let ttype = self.next_type();
        self.literals.insert(literal.to_owned(), ttype);
        self.names.insert(literal_token_name(ttype), ttype);
        ttype
    }

    /// Bind `literal` to the type of token `name` (`tokens { PLUS='+'; }`).
    ///
    /// An existing literal binding is kept; the first alias wins.
    pub fn alias_literal(&mut self, literal: &str, name: &str) -> u32 {
        let ttype = self.define_token(name);
        self.literals.entry(literal.to_owned()).or_insert(ttype);
        ttype
    }

    pub fn token_type(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn literal_type(&self, literal: &str) -> Option<u32> {
        self.literals.get(literal).copied()
    }

    /// Token name for a type, preferring declared names over `T__<n>`.
    pub fn name_of(&self, ttype: u32) -> Option<&str> {
        let mut fallback = None;
        for (name, &t) in &self.names {
            if t != ttype {
                continue;
            }
            if !name.starts_with("T__") {
                return Some(name);
            }
            fallback.get_or_insert(name.as_str());
        }
        fallback
    }

    pub fn names(&self) -> impl Iterator<Item = (&str, u32)> {
        self.names.iter().map(|(n, &t)| (n.as_str(), t))
    }

    pub fn literals(&self) -> impl Iterator<Item = (&str, u32)> {
        self.literals.iter().map(|(l, &t)| (l.as_str(), t))
    }

    pub fn max_token_type(&self) -> u32 {
        self.max_token_type
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.literals.is_empty()
    }

    /// Number of distinct token types.
    pub fn len(&self) -> usize {
        let mut types: Vec<u32> = self.names.values().chain(self.literals.values()).copied().collect();
        types.sort_unstable();
        types.dedup();
        types.len()
    }

    /// Import every entry of `other`, keeping its token types.
    ///
    /// Entries already present keep their current type.
    pub fn import(&mut self, other: &TokenVocabulary) {
        for (name, &ttype) in &other.names {
            self.names.entry(name.clone()).or_insert(ttype);
        }
        for (literal, &ttype) in &other.literals {
            self.literals.entry(literal.clone()).or_insert(ttype);
        }
        self.max_token_type = self.max_token_type.max(other.max_token_type);
    }

    /// Parse the contents of a `.tokens` file.
    pub fn parse(text: &str) -> Result<Self, VocabError> {
        let mut vocab = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.rsplit_once('=') else {
                return Err(VocabError::MalformedEntry {
                    line: idx + 1,
                    text: line.to_string(),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(VocabError::MalformedEntry {
                    line: idx + 1,
                    text: line.to_string(),
                });
            }
            let ttype: u32 = value.trim().parse().map_err(|_| VocabError::InvalidType {
                line: idx + 1,
                text: value.trim().to_string(),
            })?;

            if key.starts_with('\'') {
                vocab.literals.insert(key.to_string(), ttype);
            } else {
                vocab.names.insert(key.to_string(), ttype);
            }
            vocab.max_token_type = vocab.max_token_type.max(ttype);
        }
        Ok(vocab)
    }

    /// Render in `.tokens` format: names first, then literals, in definition order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, ttype) in self.names() {
            out.push_str(&format!("{name}={ttype}\n"));
        }
        for (literal, ttype) in self.literals() {
            out.push_str(&format!("{literal}={ttype}\n"));
        }
        out
    }

    fn next_type(&mut self) -> u32 {
        self.max_token_type += 1;
        self.max_token_type
    }
}
