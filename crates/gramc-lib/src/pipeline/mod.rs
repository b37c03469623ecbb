//! Per-file compilation.
//!
//! [`Pipeline::compile`] drives one grammar file through the frontend stages,
//! generates the root recognizer and then every delegate exactly once, writes
//! the auxiliary artifacts that are switched on, and finally compiles the
//! lexer split out of a combined grammar.

mod collaborators;
mod implicit_lexer;


use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use gramc_core::GrammarKind;

pub use collaborators::{
    BuildError, CodeGenerator, CodegenError, DependencyLister, DotGraph, FrontendError, GrammarFrontend,
    GrammarHeader, GrammarReport, HeaderScanner, ParseRequest, Problem,
};
pub use implicit_lexer::TempLexerFile;

use crate::config::ToolConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::{Composite, GrammarId};
use crate::output::{OutputSettings, OutputWriter};
use crate::source::GrammarFile;

/// Profile statistics, one JSON document per line, in the base output directory.
pub const GRAMMAR_STATS_FILE: &str = "grammar.stats";

/// Rule modifier applied to every rule in test mode.
const TEST_MODE_RULE_MODIFIER: &str = "public";

/// What one successful compilation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub generated: Vec<PathBuf>,
    /// Grammar text without actions, when printing was requested.
    pub printed: Option<String>,
    pub report: Option<GrammarReport>,
}

pub struct Pipeline<'a, F, G> {
    config: &'a ToolConfig,
    frontend: &'a F,
    generator: &'a G,
}

impl<'a, F, G> Pipeline<'a, F, G>
where
    F: GrammarFrontend,
    G: CodeGenerator,
{
    pub fn new(config: &'a ToolConfig, frontend: &'a F, generator: &'a G) -> Self {
        Self {
            config,
            frontend,
            generator,
        }
    }

    pub fn compile(&self, file: &GrammarFile, diag: &mut Diagnostics) -> Result<CompileOutput, BuildError> {
        tracing::info!(grammar = %file, "compiling");
        let text = fs::read_to_string(file.path()).map_err(|source| BuildError::CannotOpen {
            path: file.path().to_path_buf(),
            source,
        })?;

        let request = ParseRequest {
            file: file.raw(),
            path: file.path(),
            parent_dir: file.dir(),
            text: &text,
            implicit_lexer: false,
            default_rule_modifier: self.default_rule_modifier(),
            seed_vocab: None,
        };
        let mut composite = self.frontend.parse(&request, diag)?;
        self.run_stages(&mut composite, diag)?;

        let out = OutputWriter::new(OutputSettings::new(self.config, file.output_dir()));
        let mut output = CompileOutput::default();
        let mut visited = HashSet::new();
        self.generate_recognizer(&mut composite, GrammarId::ROOT, &out, &mut visited, &mut output.generated, diag)?;

        self.write_auxiliary(&composite, &out, &mut output, diag);

        if composite.root().kind() == GrammarKind::Combined
            && let Some(lexer_text) = composite.lexer_grammar_text(GrammarId::ROOT)
        {
            let generated = self.split_implicit_lexer(&composite, file, lexer_text, &out, diag)?;
            output.generated.extend(generated);
        }
        Ok(output)
    }

    fn default_rule_modifier(&self) -> Option<&'static str> {
        self.config.test_mode.then_some(TEST_MODE_RULE_MODIFIER)
    }

    /// Token types, symbols and NFAs, across the whole composite.
    pub(crate) fn run_stages(&self, composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError> {
        self.frontend.assign_token_types(composite, diag)?;
        self.frontend.define_symbols(composite, diag)?;
        self.frontend.build_nfas(composite, diag)?;
        tracing::debug!(grammar = composite.root().name(), grammars = composite.len(), "frontend stages done");
        Ok(())
    }

    /// Analyze and generate `id`, then each of its delegates not yet visited.
    pub(crate) fn generate_recognizer(
        &self,
        composite: &mut Composite,
        id: GrammarId,
        out: &OutputWriter<'_>,
        visited: &mut HashSet<GrammarId>,
        generated: &mut Vec<PathBuf>,
        diag: &mut Diagnostics,
    ) -> Result<(), BuildError> {
        if !visited.insert(id) {
            return Ok(());
        }

        if self.config.generate_nfa_dot {
            let graphs = self.frontend.nfa_graphs(composite, id);
            self.write_dot(composite.get(id).file(), graphs, out, diag);
        }

        self.frontend.analyze(composite, id, &self.config.tuning, diag)?;
        let flags = self.config.codegen_flags();
        generated.extend(self.generator.generate(composite, id, &flags, out)?);

        if self.config.generate_dfa_dot {
            let graphs = self.frontend.dfa_graphs(composite, id);
            self.write_dot(composite.get(id).file(), graphs, out, diag);
        }

        for delegate in composite.direct_delegates(id).to_vec() {
            if delegate != id {
                self.generate_recognizer(composite, delegate, out, visited, generated, diag)?;
            }
        }
        Ok(())
    }

    fn write_dot(&self, source: &str, graphs: Vec<DotGraph>, out: &OutputWriter<'_>, diag: &mut Diagnostics) {
        for graph in graphs {
            let file_name = format!("{}.dot", graph.name);
            if let Err(e) = out.write(&file_name, source, &graph.dot) {
                diag.report(DiagnosticKind::CannotGenDotFile)
                    .message(format!("{}: {e}", out.path_for(&file_name, source).display()))
                    .emit();
            }
        }
    }

    /// Printed grammar, report and profile statistics. Failures are reported
    /// and never abort the file.
    fn write_auxiliary(
        &self,
        composite: &Composite,
        out: &OutputWriter<'_>,
        output: &mut CompileOutput,
        diag: &mut Diagnostics,
    ) {
        if self.config.print_grammar {
            output.printed = Some(self.frontend.print_grammar(composite, GrammarId::ROOT));
        }
        if self.config.report {
            output.report = Some(self.frontend.report(composite));
        }
        if self.config.profile {
            let report = self.frontend.report(composite);
            let path = self.config.base_output_dir().join(GRAMMAR_STATS_FILE);
            let written = serde_json::to_string(&report)
                .map_err(std::io::Error::from)
                .and_then(|line| {
                    let mut stats = match fs::read_to_string(&path) {
                        Ok(stats) => stats,
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                        Err(e) => return Err(e),
                    };
                    stats.push_str(&line);
                    stats.push('\n');
                    out.write_at(&path, &stats)
                });
            if let Err(e) = written {
                diag.report(DiagnosticKind::CannotWriteFile)
                    .message(format!("{}: {e}", path.display()))
                    .emit();
            }
        }
    }
}
