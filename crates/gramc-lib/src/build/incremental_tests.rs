use std::path::PathBuf;

use crate::build::{BuildDependencies, needs_build};
use crate::grammar::Scanner;
use crate::pipeline::{BuildError, DependencyLister, FrontendError};
use crate::source::GrammarFile;
use crate::test_utils::{Workspace, touch_later};

/// Lister with fixed answers.
struct Fixed {
    outputs: Vec<PathBuf>,
    inputs: Vec<PathBuf>,
}

impl DependencyLister for Fixed {
    fn generated_files(&self, _file: &GrammarFile) -> Result<Vec<PathBuf>, FrontendError> {
        Ok(self.outputs.clone())
    }

    fn dependency_files(&self, _file: &GrammarFile) -> Result<Vec<PathBuf>, FrontendError> {
        Ok(self.inputs.clone())
    }
}

/// A grammar plus two outputs written after it.
fn built(ws: &Workspace) -> (GrammarFile, Fixed) {
    ws.write("T.g", "grammar T;\na : 'a' ;\n");
    let outputs = vec![ws.write("out/TParser.rs", "//"), ws.write("out/T.tokens", "")];
    for output in &outputs {
        touch_later(output, 10);
    }
    let file = GrammarFile::new("T.g", Some(ws.root()));
    (file, Fixed { outputs, inputs: Vec::new() })
}

#[test]
fn up_to_date_after_build() {
    let ws = Workspace::new();
    let (file, lister) = built(&ws);
    assert!(!needs_build(&file, &lister).unwrap());
}

#[test]
fn missing_output_forces_build() {
    let ws = Workspace::new();
    let (file, mut lister) = built(&ws);
    lister.outputs.push(ws.out("TLexer.rs"));
    assert!(needs_build(&file, &lister).unwrap());
}

#[test]
fn no_outputs_forces_build() {
    let ws = Workspace::new();
    let (file, mut lister) = built(&ws);
    lister.outputs.clear();
    assert!(needs_build(&file, &lister).unwrap());
}

#[test]
fn newer_grammar_forces_build() {
    let ws = Workspace::new();
    let (file, lister) = built(&ws);
    touch_later(&ws.path("T.g"), 20);
    assert!(needs_build(&file, &lister).unwrap());
}

#[test]
fn newer_dependency_forces_build() {
    let ws = Workspace::new();
    let (file, mut lister) = built(&ws);
    let vocab = ws.write("Base.tokens", "A=4\n");
    lister.inputs.push(vocab.clone());
    assert!(!needs_build(&file, &lister).unwrap());

    touch_later(&vocab, 20);
    assert!(needs_build(&file, &lister).unwrap());
}

#[test]
fn missing_dependency_is_ignored() {
    let ws = Workspace::new();
    let (file, mut lister) = built(&ws);
    lister.inputs.push(ws.path("Gone.g"));
    assert!(!needs_build(&file, &lister).unwrap());
}

#[test]
fn missing_grammar_is_timestamp_error() {
    let ws = Workspace::new();
    let (_, lister) = built(&ws);
    let file = GrammarFile::new("Nowhere.g", Some(ws.root()));

    let err = needs_build(&file, &lister).unwrap_err();
    assert!(matches!(err, BuildError::Timestamp { .. }));
}

#[test]
fn real_lister_sees_missing_outputs() {
    let ws = Workspace::new();
    ws.write("T.g", "grammar T;\na : 'a' ;\n");
    let config = ws.config();
    let lister = BuildDependencies::new(&config, Scanner::new());
    let file = GrammarFile::new("T.g", config.input_dir.as_deref());

    assert!(needs_build(&file, &lister).unwrap());
}
