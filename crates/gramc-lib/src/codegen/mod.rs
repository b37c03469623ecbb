//! Recognizer code generation.
//!
//! The target is picked from the grammar's `language` option. Every grammar
//! gets one recognizer file; the root of a composite also gets the
//! `<Name>.tokens` vocabulary that other grammars import.

mod emit;

#[cfg(test)]
mod emit_tests;

use std::path::PathBuf;

use gramc_core::naming::{recognizer_name, vocab_file_name};

pub use emit::{emit_recognizer, emit_vocab};

use crate::config::CodegenFlags;
use crate::grammar::{Composite, GrammarId, Stage};
use crate::output::OutputWriter;
use crate::pipeline::{CodeGenerator, CodegenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Rust,
    Java,
    CSharp,
}

impl Target {
    /// Target named by a `language` option; Rust when absent.
    pub fn from_language(language: Option<&str>) -> Result<Self, CodegenError> {
        match language {
            None | Some("Rust") => Ok(Self::Rust),
            Some("Java") => Ok(Self::Java),
            Some("CSharp" | "CSharp2" | "CSharp3") => Ok(Self::CSharp),
            Some(other) => Err(CodegenError::UnknownTarget(other.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Rust => ".rs",
            Self::Java => ".java",
            Self::CSharp => ".cs",
        }
    }
}

/// Name of the recognizer generated for `id`. Delegates are prefixed with
/// the root's recognizer name so two composites importing the same grammar
/// never collide.
pub fn recognizer_name_of(composite: &Composite, id: GrammarId) -> String {
    let root = composite.root();
    let root_name = recognizer_name(root.name(), root.kind());
    if id == GrammarId::ROOT {
        return root_name;
    }
    format!("{root_name}_{}", composite.get(id).name())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecognizerEmitter;

impl RecognizerEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RecognizerEmitter {
    fn generate(
        &self,
        composite: &Composite,
        id: GrammarId,
        flags: &CodegenFlags,
        out: &OutputWriter<'_>,
    ) -> Result<Vec<PathBuf>, CodegenError> {
        composite.require(id, Stage::Analyzed, "code generation")?;
        let grammar = composite.get(id);
        let target = Target::from_language(composite.root().language())?;
        let name = recognizer_name_of(composite, id);

        let mut files = vec![(
            format!("{name}{}", target.extension()),
            emit_recognizer(composite, id, flags, target),
        )];
        if id == GrammarId::ROOT {
            files.push((vocab_file_name(grammar.name()), emit_vocab(composite)));
        }

        let mut written = Vec::with_capacity(files.len());
        for (file_name, contents) in files {
            let path = out
                .write(&file_name, grammar.file(), &contents)
                .map_err(|source| CodegenError::Io {
                    path: out.path_for(&file_name, grammar.file()),
                    source,
                })?;
            written.push(path);
        }
        Ok(written)
    }
}
