//! Where generated files go.
//!
//! [`resolve_output_directory`] is recomputed for every write and never
//! cached. [`OutputWriter`] is the only place that creates output files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use gramc_core::naming::is_vocab_file;

use crate::config::ToolConfig;

/// The parts of the configuration that decide output locations.
#[derive(Debug, Clone, Copy)]
pub struct OutputSettings<'a> {
    pub output_dir: Option<&'a Path>,
    pub input_dir: Option<&'a Path>,
    pub force_all_files_to_output_dir: bool,
    pub force_relative_output: bool,
    /// Directory component of the root grammar's name as given, `.` if none.
    pub grammar_output_dir: &'a str,
}

impl<'a> OutputSettings<'a> {
    pub fn new(config: &'a ToolConfig, grammar_output_dir: &'a str) -> Self {
        Self {
            output_dir: config.output_dir.as_deref(),
            input_dir: config.input_dir.as_deref(),
            force_all_files_to_output_dir: config.force_all_files_to_output_dir,
            force_relative_output: config.force_relative_output,
            grammar_output_dir,
        }
    }
}

/// Directory that `target` (a bare file name) is written to, for output
/// derived from the grammar at `source`.
///
/// - `-o /tmp /var/lib/T.g` gives `/tmp`
/// - `-o out sub/T.g` gives `out/sub`
/// - no `-o`, `grammars/T.g` gives `grammars`
///
/// Vocabulary files always go to the base output directory.
pub fn resolve_output_directory(target: &str, source: &str, settings: &OutputSettings<'_>) -> PathBuf {
    if is_vocab_file(target) {
        return settings.output_dir.unwrap_or(Path::new(".")).to_path_buf();
    }

    let file_directory = match source.rfind(['/', '\\']) {
        None => settings.grammar_output_dir,
        Some(0) => "/",
        Some(idx) => &source[..idx],
    };

    let Some(output_dir) = settings.output_dir else {
        return PathBuf::from(file_directory);
    };

    let pinned = Path::new(file_directory).is_absolute() || file_directory.starts_with('~');
    if settings.force_all_files_to_output_dir || (!settings.force_relative_output && pinned) {
        return output_dir.to_path_buf();
    }

    let relative = relative_file_directory(file_directory, settings.input_dir);
    if relative.as_os_str().is_empty() {
        return output_dir.to_path_buf();
    }
    output_dir.join(relative)
}

fn relative_file_directory(file_directory: &str, input_dir: Option<&Path>) -> PathBuf {
    let dir = Path::new(file_directory);
    if !dir.is_absolute() {
        return dir.components().filter(|c| !matches!(c, Component::CurDir)).collect();
    }
    if let Some(rel) = input_dir.and_then(|input| dir.strip_prefix(input).ok()) {
        return rel.to_path_buf();
    }
    dir.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Writes generated files at resolved locations.
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter<'a> {
    settings: OutputSettings<'a>,
}

impl<'a> OutputWriter<'a> {
    pub fn new(settings: OutputSettings<'a>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OutputSettings<'a> {
        &self.settings
    }

    pub fn path_for(&self, file_name: &str, source: &str) -> PathBuf {
        resolve_output_directory(file_name, source, &self.settings).join(file_name)
    }

    /// Write `contents` to `file_name` next to the output of `source`.
    ///
    /// Missing directories are created and an existing file is replaced.
    pub fn write(&self, file_name: &str, source: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.path_for(file_name, source);
        self.write_at(&path, contents)?;
        Ok(path)
    }

    /// Write to a path the caller already resolved.
    pub fn write_at(&self, path: &Path, contents: &str) -> io::Result<()> {
        write_replacing(path, contents)?;
        tracing::debug!(path = %path.display(), "wrote output file");
        Ok(())
    }
}

fn write_replacing(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    if path.exists() {
        fs::remove_file(path)?;
    }
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}
