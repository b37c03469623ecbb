//! The top-level run over every requested grammar file.

use std::path::PathBuf;

use indexmap::IndexSet;
use serde::Serialize;

use crate::build::{BuildDependencies, needs_build, sort_grammar_files};
use crate::codegen::RecognizerEmitter;
use crate::config::ToolConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::{BuiltinFrontend, Scanner};
use crate::pipeline::{
    BuildError, CodeGenerator, CodegenError, FrontendError, GrammarFrontend, GrammarReport, HeaderScanner, Pipeline,
    Problem,
};
use crate::source::GrammarFile;

/// Outcome of [`Tool::process`], by grammar file name as requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub compiled: Vec<String>,
    /// Up to date in make mode.
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub generated: Vec<PathBuf>,
    /// `output : input` lines in depend mode.
    pub dependencies: Vec<String>,
    /// Grammars printed without actions.
    pub printed: Vec<String>,
    pub reports: Vec<GrammarReport>,
}

pub struct Tool<F = BuiltinFrontend, G = RecognizerEmitter, S = Scanner> {
    config: ToolConfig,
    frontend: F,
    generator: G,
    scanner: S,
    files: IndexSet<GrammarFile>,
    diag: Diagnostics,
}

impl Tool {
    /// A tool using the built-in frontend, code generator and header scanner.
    pub fn new(config: ToolConfig) -> Self {
        let mut diag = Diagnostics::new();
        let mut config = config;
        config.validate(&mut diag);
        let frontend = BuiltinFrontend::new(&config);
        Self {
            config,
            frontend,
            generator: RecognizerEmitter::new(),
            scanner: Scanner::new(),
            files: IndexSet::new(),
            diag,
        }
    }
}

impl<F, G, S> Tool<F, G, S>
where
    F: GrammarFrontend,
    G: CodeGenerator,
    S: HeaderScanner,
{
    pub fn with_collaborators(mut config: ToolConfig, frontend: F, generator: G, scanner: S) -> Self {
        let mut diag = Diagnostics::new();
        config.validate(&mut diag);
        Self {
            config,
            frontend,
            generator,
            scanner,
            files: IndexSet::new(),
            diag,
        }
    }

    /// Queue a grammar file; a name already queued is ignored.
    pub fn add_grammar_file(&mut self, name: impl Into<String>) {
        let file = GrammarFile::new(name, self.config.input_dir.as_deref());
        self.files.insert(file);
    }

    pub fn grammar_files(&self) -> impl Iterator<Item = &GrammarFile> {
        self.files.iter()
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    /// Errors reported so far, configuration problems included.
    pub fn error_count(&self) -> usize {
        self.diag.error_count()
    }

    /// Build every queued file in dependency order.
    ///
    /// A failing file is reported once and the next one is attempted.
    pub fn process(&mut self) -> ProcessReport {
        if self.config.verbose {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "gramc grammar build tool");
        }

        let files: Vec<GrammarFile> = self.files.iter().cloned().collect();
        let ordered = match sort_grammar_files(&files, &self.scanner) {
            Ok(sorted) => sorted,
            Err(e) => {
                self.diag
                    .report(DiagnosticKind::InternalError)
                    .message(format!("cannot sort grammar files, building in the order given: {e}"))
                    .emit();
                files
            }
        };

        let lister = BuildDependencies::new(&self.config, &self.scanner);
        let pipeline = Pipeline::new(&self.config, &self.frontend, &self.generator);
        let mut report = ProcessReport::default();

        for file in ordered {
            if self.config.depend {
                match lister.dependency_lines(&file) {
                    Ok(lines) => report.dependencies.extend(lines),
                    Err(e) => {
                        report_build_error(&mut self.diag, &file, e.into());
                        report.failed.push(file.raw().to_string());
                    }
                }
                continue;
            }

            if self.config.make {
                match needs_build(&file, &lister) {
                    Ok(false) => {
                        tracing::info!(grammar = %file, "up to date");
                        report.skipped.push(file.raw().to_string());
                        continue;
                    }
                    Ok(true) => {}
                    // The compile below reports the unreadable grammar.
                    Err(BuildError::Frontend(e)) => {
                        tracing::debug!(grammar = %file, error = %e, "cannot check outputs, building");
                    }
                    Err(e) => {
                        self.diag
                            .report(DiagnosticKind::InternalError)
                            .file(file.raw())
                            .message(format!("cannot check whether {file} is up to date: {e}"))
                            .emit();
                    }
                }
            }

            match pipeline.compile(&file, &mut self.diag) {
                Ok(output) => {
                    report.compiled.push(file.raw().to_string());
                    report.generated.extend(output.generated);
                    report.printed.extend(output.printed);
                    report.reports.extend(output.report);
                }
                Err(e) => {
                    tracing::debug!(grammar = %file, error = %e, "build failed");
                    report_build_error(&mut self.diag, &file, e);
                    report.failed.push(file.raw().to_string());
                }
            }
        }

        tracing::info!(
            compiled = report.compiled.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            errors = self.diag.error_count(),
            "done"
        );
        report
    }
}

/// Turn a failed build into exactly one diagnostic.
fn report_build_error(diag: &mut Diagnostics, file: &GrammarFile, err: BuildError) {
    match err {
        BuildError::CannotOpen { path, .. }
        | BuildError::Frontend(FrontendError::Io { path, .. })
        | BuildError::Codegen(CodegenError::Frontend(FrontendError::Io { path, .. })) => {
            diag.report(DiagnosticKind::CannotOpenFile)
                .message(path.display().to_string())
                .emit();
        }
        BuildError::CannotWriteLexer { path, source } => {
            diag.report(DiagnosticKind::CannotWriteGeneratedLexer)
                .file(file.raw())
                .message(format!("{}: {source}", path.display()))
                .emit();
        }
        BuildError::Codegen(CodegenError::Io { path, source }) => {
            diag.report(DiagnosticKind::CannotWriteFile)
                .file(file.raw())
                .message(format!("{}: {source}", path.display()))
                .emit();
        }
        BuildError::Frontend(FrontendError::Grammar { problems })
        | BuildError::Codegen(CodegenError::Frontend(FrontendError::Grammar { problems })) => {
            report_problems(diag, file, problems);
        }
        other => {
            diag.report(DiagnosticKind::InternalError)
                .file(file.raw())
                .message(other.to_string())
                .emit();
        }
    }
}

/// One diagnostic at the first problem; the others in the same file become
/// related locations.
fn report_problems(diag: &mut Diagnostics, file: &GrammarFile, problems: Vec<Problem>) {
    let mut problems = problems.into_iter();
    let Some(first) = problems.next() else {
        diag.report(DiagnosticKind::GrammarError)
            .file(file.raw())
            .message(format!("{file} has errors"))
            .emit();
        return;
    };

    let mut related = Vec::new();
    let mut elsewhere = 0usize;
    for problem in problems {
        if problem.file == first.file {
            related.push(problem);
        } else {
            elsewhere += 1;
        }
    }

    let message = match elsewhere {
        0 => first.message,
        n => format!("{} (and {n} more in imported grammars)", first.message),
    };
    let mut builder = diag
        .report(DiagnosticKind::GrammarError)
        .file(first.file)
        .at(first.range)
        .message(message);
    for problem in related {
        builder = builder.related_to(problem.message, problem.range);
    }
    builder.emit();
}
