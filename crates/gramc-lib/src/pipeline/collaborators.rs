//! Seams between the build orchestrator and the grammar machinery.
//!
//! The orchestrator only talks to these traits. [`crate::grammar::BuiltinFrontend`],
//! [`crate::grammar::Scanner`], [`crate::codegen::RecognizerEmitter`] and
//! [`crate::build::BuildDependencies`] are the shipped implementations.

use std::io;
use std::path::{Path, PathBuf};

use gramc_core::{GrammarKind, TokenVocabulary, VocabError};
use rowan::TextRange;
use serde::Serialize;

use crate::config::{AnalysisTuning, CodegenFlags};
use crate::diagnostics::Diagnostics;
use crate::grammar::{Composite, GrammarId, Stage};
use crate::output::OutputWriter;
use crate::source::GrammarFile;

/// A located problem in grammar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub file: String,
    pub range: TextRange,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{} grammar error(s)", .problems.len())]
    Grammar { problems: Vec<Problem> },

    #[error("{operation} on grammar {grammar} requires stage {required:?}, found {found:?}")]
    Stage {
        grammar: String,
        operation: &'static str,
        required: Stage,
        found: Stage,
    },

    #[error("malformed vocabulary {}: {source}", .path.display())]
    Vocab { path: PathBuf, source: VocabError },
}

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("cannot write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("unknown target language `{0}`")]
    UnknownTarget(String),

    #[error(transparent)]
    Frontend(#[from] FrontendError),
}

/// Failure of one grammar file's build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot open {}: {source}", .path.display())]
    CannotOpen { path: PathBuf, source: io::Error },

    #[error("cannot write generated lexer {}: {source}", .path.display())]
    CannotWriteLexer { path: PathBuf, source: io::Error },

    #[error("cannot read timestamp of {}: {source}", .path.display())]
    Timestamp { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// What can be learned about a grammar file without parsing its rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarHeader {
    pub name: String,
    pub kind: GrammarKind,
    pub token_vocab: Option<String>,
    pub imports: Vec<String>,
    pub language: Option<String>,
    /// At least one lexer rule, fragments included.
    pub lexer_rules: bool,
    /// A literal quoted in a parser rule or a `tokens` section.
    pub literals: bool,
}

impl GrammarHeader {
    /// Whether compiling a combined grammar with these delegates splits out a
    /// lexer grammar. Lexer rules only count in the root.
    pub fn has_implicit_lexer<'a>(&self, delegates: impl IntoIterator<Item = &'a GrammarHeader>) -> bool {
        self.kind == GrammarKind::Combined
            && (self.lexer_rules || self.literals || delegates.into_iter().any(|d| d.literals))
    }
}

/// Everything the frontend needs to parse one grammar text.
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    /// Name used for output resolution and diagnostics.
    pub file: &'a str,
    pub path: &'a Path,
    /// Searched for imports after the library directory.
    pub parent_dir: &'a Path,
    pub text: &'a str,
    pub implicit_lexer: bool,
    pub default_rule_modifier: Option<&'a str>,
    /// Vocabulary the composite starts from.
    pub seed_vocab: Option<&'a TokenVocabulary>,
}

/// A named Graphviz document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    /// File stem; `.dot` is appended when written.
    pub name: String,
    pub dot: String,
}

/// Summary of a compiled composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarReport {
    pub grammar: String,
    pub kind: GrammarKind,
    pub file: String,
    pub language: Option<String>,
    pub rules: usize,
    pub lexer_rules: usize,
    pub decisions: usize,
    pub ll1_decisions: usize,
    pub ambiguous_decisions: usize,
    pub timed_out_decisions: usize,
    pub tokens: usize,
    pub delegates: Vec<String>,
}

impl std::fmt::Display for GrammarReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "grammar {} ({}) from {}", self.grammar, self.kind, self.file)?;
        if let Some(language) = &self.language {
            writeln!(f, "language: {language}")?;
        }
        writeln!(f, "rules: {} ({} lexer)", self.rules, self.lexer_rules)?;
        writeln!(f, "tokens: {}", self.tokens)?;
        writeln!(
            f,
            "decisions: {} ({} LL(1), {} ambiguous, {} timed out)",
            self.decisions, self.ll1_decisions, self.ambiguous_decisions, self.timed_out_decisions
        )?;
        if !self.delegates.is_empty() {
            writeln!(f, "delegates: {}", self.delegates.join(", "))?;
        }
        Ok(())
    }
}

pub trait HeaderScanner {
    /// Reads the grammar header only; rules are never parsed.
    fn scan(&self, path: &Path) -> Result<GrammarHeader, FrontendError>;
}

impl<T: HeaderScanner + ?Sized> HeaderScanner for &T {
    fn scan(&self, path: &Path) -> Result<GrammarHeader, FrontendError> {
        (**self).scan(path)
    }
}

pub trait GrammarFrontend {
    /// Parse the text and every grammar it imports.
    fn parse(&self, request: &ParseRequest<'_>, diag: &mut Diagnostics) -> Result<Composite, FrontendError>;

    fn assign_token_types(&self, composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError>;

    fn define_symbols(&self, composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError>;

    fn build_nfas(&self, composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError>;

    /// Decision analysis of one grammar; every grammar of the composite must
    /// have its NFA.
    fn analyze(
        &self,
        composite: &mut Composite,
        id: GrammarId,
        tuning: &AnalysisTuning,
        diag: &mut Diagnostics,
    ) -> Result<(), FrontendError>;

    /// Grammar text with actions stripped.
    fn print_grammar(&self, composite: &Composite, id: GrammarId) -> String;

    fn nfa_graphs(&self, composite: &Composite, id: GrammarId) -> Vec<DotGraph>;

    fn dfa_graphs(&self, composite: &Composite, id: GrammarId) -> Vec<DotGraph>;

    fn report(&self, composite: &Composite) -> GrammarReport;
}

pub trait CodeGenerator {
    /// Emit the recognizer of one grammar. Returns the written paths.
    fn generate(
        &self,
        composite: &Composite,
        id: GrammarId,
        flags: &CodegenFlags,
        out: &OutputWriter<'_>,
    ) -> Result<Vec<PathBuf>, CodegenError>;
}

pub trait DependencyLister {
    /// Files a build of `file` writes.
    fn generated_files(&self, file: &GrammarFile) -> Result<Vec<PathBuf>, FrontendError>;

    /// Files other than `file` itself that a build of `file` reads.
    fn dependency_files(&self, file: &GrammarFile) -> Result<Vec<PathBuf>, FrontendError>;
}
