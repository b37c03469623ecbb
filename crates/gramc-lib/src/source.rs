//! Grammar files named on the command line.

use std::path::{Path, PathBuf};

use gramc_core::naming::grammar_output_directory;

/// A requested grammar file: the name as given plus where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrammarFile {
    raw: String,
    path: PathBuf,
    dir: PathBuf,
}

impl GrammarFile {
    /// Relative names are looked up under `input_dir` when one is configured.
    pub fn new(raw: impl Into<String>, input_dir: Option<&Path>) -> Self {
        let raw = raw.into();
        let path = match input_dir {
            Some(input) => input.join(&raw),
            None => PathBuf::from(&raw),
        };
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self { raw, path, dir }
    }

    /// The name exactly as requested.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Where the file is read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory searched for imports after the library directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory component of the raw name, `.` when it has none.
    pub fn output_dir(&self) -> &str {
        grammar_output_directory(&self.raw)
    }
}

impl std::fmt::Display for GrammarFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
