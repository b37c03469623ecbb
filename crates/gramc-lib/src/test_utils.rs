//! Test utilities: in-memory compilation and scratch grammar directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{AnalysisTuning, ToolConfig};
use crate::diagnostics::Diagnostics;
use crate::grammar::{BuiltinFrontend, Composite, GrammarId};
use crate::pipeline::{FrontendError, GrammarFrontend, ParseRequest, Problem};

/// Parse `source` as `T.g` and run every frontend stage, analysis included.
pub fn compile_text(source: &str) -> (Composite, Diagnostics) {
    match try_compile_text(source) {
        Ok(result) => result,
        Err(e) => panic!("expected grammar to compile, got {e:?}"),
    }
}

pub fn try_compile_text(source: &str) -> Result<(Composite, Diagnostics), FrontendError> {
    let frontend = BuiltinFrontend::default();
    let mut diag = Diagnostics::new();
    let mut composite = parse_text(&frontend, source, &mut diag)?;
    frontend.assign_token_types(&mut composite, &mut diag)?;
    frontend.define_symbols(&mut composite, &mut diag)?;
    frontend.build_nfas(&mut composite, &mut diag)?;
    let ids: Vec<GrammarId> = composite.ids().collect();
    for id in ids {
        frontend.analyze(&mut composite, id, &AnalysisTuning::default(), &mut diag)?;
    }
    Ok((composite, diag))
}

pub fn parse_text(
    frontend: &BuiltinFrontend,
    source: &str,
    diag: &mut Diagnostics,
) -> Result<Composite, FrontendError> {
    let request = ParseRequest {
        file: "T.g",
        path: Path::new("T.g"),
        parent_dir: Path::new("."),
        text: source,
        implicit_lexer: false,
        default_rule_modifier: None,
        seed_vocab: None,
    };
    frontend.parse(&request, diag)
}

/// Parse a grammar file on disk; imports resolve next to it.
pub fn parse_file(frontend: &BuiltinFrontend, path: &Path, diag: &mut Diagnostics) -> Result<Composite, FrontendError> {
    let text = fs::read_to_string(path).expect("read grammar");
    let file = path.display().to_string();
    let parent_dir = path.parent().expect("grammar has a parent dir");
    let request = ParseRequest {
        file: &file,
        path,
        parent_dir,
        text: &text,
        implicit_lexer: false,
        default_rule_modifier: None,
        seed_vocab: None,
    };
    frontend.parse(&request, diag)
}

/// Problems of a grammar expected to fail some stage.
pub fn grammar_problems(source: &str) -> Vec<Problem> {
    match try_compile_text(source) {
        Err(FrontendError::Grammar { problems }) => problems,
        other => panic!("expected grammar problems, got {other:?}"),
    }
}

/// Problem messages only, one per line.
pub fn problem_messages(source: &str) -> String {
    grammar_problems(source)
        .into_iter()
        .map(|p| p.message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A temporary directory holding grammar files, with `out/` as output directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join("out").join(name)
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create grammar dir");
        }
        fs::write(&path, text).expect("write grammar");
        path
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }

    /// Grammar names are relative to the workspace; outputs go to `out/`.
    pub fn config(&self) -> ToolConfig {
        ToolConfig::new()
            .with_input_dir(self.root())
            .with_output_dir(self.path("out"))
            .with_lib_dir(self.root().display().to_string())
    }
}

/// Push the modification time of `path` forward by `secs` seconds.
pub fn touch_later(path: &Path, secs: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).expect("open for touch");
    let time = std::time::SystemTime::now() + std::time::Duration::from_secs(secs);
    file.set_modified(time).expect("set mtime");
}
