use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ToolConfig;
use crate::output::{OutputSettings, OutputWriter, resolve_output_directory};

fn settings<'a>(output_dir: Option<&'a Path>) -> OutputSettings<'a> {
    OutputSettings {
        output_dir,
        input_dir: None,
        force_all_files_to_output_dir: false,
        force_relative_output: false,
        grammar_output_dir: ".",
    }
}

#[test]
fn absolute_grammar_goes_to_output_dir() {
    let s = settings(Some(Path::new("/tmp")));
    assert_eq!(
        resolve_output_directory("TParser.rs", "/var/lib/T.g", &s),
        PathBuf::from("/tmp")
    );
}

#[test]
fn relative_grammar_nests_under_output_dir() {
    let s = settings(Some(Path::new("out")));
    assert_eq!(
        resolve_output_directory("TParser.rs", "sub/T.g", &s),
        PathBuf::from("out/sub")
    );
}

#[test]
fn without_output_dir_uses_grammar_dir() {
    let s = settings(None);
    assert_eq!(
        resolve_output_directory("TParser.rs", "grammars/T.g", &s),
        PathBuf::from("grammars")
    );
}

#[test]
fn vocab_always_in_base_dir() {
    let s = settings(Some(Path::new("out")));
    assert_eq!(
        resolve_output_directory("T.tokens", "sub/T.g", &s),
        PathBuf::from("out")
    );
    assert_eq!(
        resolve_output_directory("T.tokens", "sub/T.g", &settings(None)),
        PathBuf::from(".")
    );
}

#[test]
fn bare_source_uses_recorded_grammar_dir() {
    let mut s = settings(Some(Path::new("out")));
    s.grammar_output_dir = "sub";
    assert_eq!(
        resolve_output_directory("T__.g", "T__.g", &s),
        PathBuf::from("out/sub")
    );
    s.output_dir = None;
    assert_eq!(resolve_output_directory("T__.g", "T__.g", &s), PathBuf::from("sub"));
}

#[test]
fn grammar_in_current_dir_writes_to_output_dir_itself() {
    let s = settings(Some(Path::new("out")));
    let dir = resolve_output_directory("TParser.rs", "T.g", &s);
    assert_eq!(dir.display().to_string(), "out");

    let dir = resolve_output_directory("TParser.rs", "./sub/T.g", &s);
    assert_eq!(dir.display().to_string(), "out/sub");
}

#[test]
fn force_all_ignores_grammar_dir() {
    let mut s = settings(Some(Path::new("out")));
    s.force_all_files_to_output_dir = true;
    assert_eq!(
        resolve_output_directory("TParser.rs", "sub/T.g", &s),
        PathBuf::from("out")
    );
}

#[test]
fn home_relative_dir_is_pinned() {
    let s = settings(Some(Path::new("out")));
    assert_eq!(
        resolve_output_directory("TParser.rs", "~/g/T.g", &s),
        PathBuf::from("out")
    );
}

#[test]
fn force_relative_strips_input_dir() {
    let mut s = settings(Some(Path::new("out")));
    s.force_relative_output = true;
    s.input_dir = Some(Path::new("/src/grammars"));
    assert_eq!(
        resolve_output_directory("TParser.rs", "/src/grammars/pkg/T.g", &s),
        PathBuf::from("out/pkg")
    );

    s.input_dir = None;
    assert_eq!(
        resolve_output_directory("TParser.rs", "/abs/pkg/T.g", &s),
        PathBuf::from("out/abs/pkg")
    );
}

#[test]
fn resolver_is_idempotent() {
    let s = settings(Some(Path::new("out")));
    let first = resolve_output_directory("TParser.rs", "sub/T.g", &s);
    let second = resolve_output_directory("TParser.rs", "sub/T.g", &s);
    assert_eq!(first, second);
}

#[test]
fn settings_from_config() {
    let config = ToolConfig::new().with_forced_output_dir("gen");
    let s = OutputSettings::new(&config, "sub");
    assert_eq!(s.output_dir, Some(Path::new("gen")));
    assert!(s.force_all_files_to_output_dir);
    assert_eq!(s.grammar_output_dir, "sub");
}

#[test]
fn writer_creates_dirs_and_replaces() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");
    let writer = OutputWriter::new(settings(Some(out.as_path())));

    let path = writer.write("TParser.rs", "sub/T.g", "first").unwrap();
    assert_eq!(path, out.join("sub").join("TParser.rs"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "first");

    writer.write("TParser.rs", "sub/T.g", "second").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
}
