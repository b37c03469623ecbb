//! Compiling the lexer half of a combined grammar.
//!
//! The lexer text is written next to the parent's output as `<Name>__.g`,
//! parsed as a grammar of its own seeded with the parent's vocabulary so the
//! token types agree, and compiled like any other root. The written file is
//! removed again unless it was asked to be kept.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use gramc_core::naming::implicit_lexer_file_name;

use super::{BuildError, CodeGenerator, GrammarFrontend, ParseRequest, Pipeline};
use crate::diagnostics::Diagnostics;
use crate::grammar::{Composite, GrammarId};
use crate::output::OutputWriter;
use crate::source::GrammarFile;

/// Deletes the written lexer grammar when dropped, if `delete` is set.
#[derive(Debug)]
pub struct TempLexerFile {
    path: PathBuf,
    delete: bool,
}

impl TempLexerFile {
    pub fn new(path: PathBuf, delete: bool) -> Self {
        Self { path, delete }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempLexerFile {
    fn drop(&mut self) {
        if !self.delete {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "cannot remove temporary lexer grammar");
        }
    }
}

impl<F, G> Pipeline<'_, F, G>
where
    F: GrammarFrontend,
    G: CodeGenerator,
{
    pub(crate) fn split_implicit_lexer(
        &self,
        parent: &Composite,
        file: &GrammarFile,
        lexer_text: &str,
        out: &OutputWriter<'_>,
        diag: &mut Diagnostics,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let file_name = implicit_lexer_file_name(parent.root().name());
        let path = out
            .write(&file_name, file.raw(), lexer_text)
            .map_err(|source| BuildError::CannotWriteLexer {
                path: out.path_for(&file_name, file.raw()),
                source,
            })?;
        let temp = TempLexerFile::new(path, self.config.delete_temp_lexer);
        tracing::debug!(path = %temp.path().display(), "wrote implicit lexer grammar");

        let request = ParseRequest {
            file: &file_name,
            path: temp.path(),
            parent_dir: file.dir(),
            text: lexer_text,
            implicit_lexer: true,
            default_rule_modifier: self.default_rule_modifier(),
            seed_vocab: Some(parent.vocab()),
        };
        let mut lexer = self.frontend.parse(&request, diag)?;
        self.run_stages(&mut lexer, diag)?;

        let mut generated = Vec::new();
        if !self.config.delete_temp_lexer {
            generated.push(temp.path().to_path_buf());
        }
        self.generate_recognizer(&mut lexer, GrammarId::ROOT, out, &mut HashSet::new(), &mut generated, diag)?;
        Ok(generated)
    }
}
