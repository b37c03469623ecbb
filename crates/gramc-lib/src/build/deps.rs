//! Files a grammar build writes and reads, known from headers alone.

use std::path::PathBuf;

use indexmap::IndexSet;

use gramc_core::naming::{implicit_lexer_file_name, implicit_lexer_name, recognizer_name, vocab_file_name};

use crate::codegen::Target;
use crate::config::ToolConfig;
use crate::grammar::BuiltinFrontend;
use crate::grammar::tokens::VocabDirs;
use crate::output::{OutputSettings, OutputWriter};
use crate::pipeline::{DependencyLister, FrontendError, GrammarHeader, HeaderScanner};
use crate::source::GrammarFile;

#[derive(Debug, Clone)]
pub struct BuildDependencies<'a, S> {
    config: &'a ToolConfig,
    scanner: S,
    imports: BuiltinFrontend,
}

impl<'a, S: HeaderScanner> BuildDependencies<'a, S> {
    pub fn new(config: &'a ToolConfig, scanner: S) -> Self {
        Self {
            config,
            scanner,
            imports: BuiltinFrontend::new(config),
        }
    }

    /// `output : input` lines, one per pair, as a makefile would list them.
    pub fn dependency_lines(&self, file: &GrammarFile) -> Result<Vec<String>, FrontendError> {
        let outputs = self.generated_files(file)?;
        let mut inputs = vec![file.path().to_path_buf()];
        inputs.extend(self.dependency_files(file)?);

        let mut lines = Vec::with_capacity(outputs.len() * inputs.len());
        for output in &outputs {
            for input in &inputs {
                lines.push(format!("{} : {}", output.display(), input.display()));
            }
        }
        Ok(lines)
    }

    /// Imported grammar files, transitively, with their headers.
    fn delegates(&self, file: &GrammarFile, header: &GrammarHeader) -> Result<Vec<(PathBuf, GrammarHeader)>, FrontendError> {
        let mut seen: IndexSet<String> = IndexSet::from([header.name.clone()]);
        let mut found = Vec::new();
        let mut pending: Vec<(String, PathBuf)> = header
            .imports
            .iter()
            .map(|name| (name.clone(), file.dir().to_path_buf()))
            .collect();
        pending.reverse();

        while let Some((name, parent_dir)) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let Some(path) = self.imports.locate_import(&name, &parent_dir) else {
                continue;
            };
            let delegate = self.scanner.scan(&path)?;
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            pending.extend(delegate.imports.iter().rev().map(|n| (n.clone(), dir.clone())));
            found.push((path, delegate));
        }
        Ok(found)
    }
}

impl<S: HeaderScanner> DependencyLister for BuildDependencies<'_, S> {
    fn generated_files(&self, file: &GrammarFile) -> Result<Vec<PathBuf>, FrontendError> {
        let header = self.scanner.scan(file.path())?;
        let ext = Target::from_language(header.language.as_deref())
            .unwrap_or_default()
            .extension();
        let out = OutputWriter::new(OutputSettings::new(self.config, file.output_dir()));
        let source = file.raw();

        let delegates = self.delegates(file, &header)?;
        let recognizer = recognizer_name(&header.name, header.kind);
        let mut files = vec![
            out.path_for(&format!("{recognizer}{ext}"), source),
            out.path_for(&vocab_file_name(&header.name), source),
        ];

        if header.has_implicit_lexer(delegates.iter().map(|(_, d)| d)) {
            let lexer = implicit_lexer_name(&header.name);
            let lexer_file = implicit_lexer_file_name(&header.name);
            files.push(out.path_for(&format!("{lexer}{ext}"), &lexer_file));
            files.push(out.path_for(&vocab_file_name(&lexer), &lexer_file));
            if !self.config.delete_temp_lexer {
                files.push(out.path_for(&lexer_file, source));
            }
        }

        for (path, delegate) in &delegates {
            let name = format!("{recognizer}_{}{ext}", delegate.name);
            files.push(out.path_for(&name, &path.display().to_string()));
        }
        Ok(files)
    }

    fn dependency_files(&self, file: &GrammarFile) -> Result<Vec<PathBuf>, FrontendError> {
        let header = self.scanner.scan(file.path())?;
        let mut files = Vec::new();
        if let Some(vocab) = &header.token_vocab {
            let dirs = VocabDirs {
                lib_dir: &self.config.lib_dir,
                output_dir: self.config.output_dir.as_deref(),
            };
            files.push(dirs.locate(vocab));
        }
        files.extend(self.delegates(file, &header)?.into_iter().map(|(path, _)| path));
        Ok(files)
    }
}
