//! The shipped [`GrammarFrontend`]: parses grammar files and their imports,
//! then runs the stages defined in the sibling modules.

use std::fs;
use std::path::{Path, PathBuf};

use gramc_core::GRAMMAR_FILE_EXTENSION;

use super::ast::Import;
use super::tokens::VocabDirs;
use super::{Composite, Grammar, GrammarId, analysis, nfa, parse, render, symbols, tokens};
use crate::config::{AnalysisTuning, ToolConfig};
use crate::diagnostics::Diagnostics;
use crate::pipeline::{DotGraph, FrontendError, GrammarFrontend, GrammarReport, ParseRequest, Problem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinFrontend {
    lib_dir: PathBuf,
    output_dir: Option<PathBuf>,
    tuning: AnalysisTuning,
}

impl Default for BuiltinFrontend {
    fn default() -> Self {
        Self::new(&ToolConfig::default())
    }
}

impl BuiltinFrontend {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            lib_dir: config.lib_dir.clone(),
            output_dir: config.output_dir.clone(),
            tuning: config.tuning.clone(),
        }
    }

    /// Imported grammar `name`: the library directory first, then the
    /// directory of the importing grammar.
    pub fn locate_import(&self, name: &str, parent_dir: &Path) -> Option<PathBuf> {
        let file = format!("{name}{GRAMMAR_FILE_EXTENSION}");
        [self.lib_dir.join(&file), parent_dir.join(&file)]
            .into_iter()
            .find(|p| p.is_file())
    }

    fn vocab_dirs(&self) -> VocabDirs<'_> {
        VocabDirs {
            lib_dir: &self.lib_dir,
            output_dir: self.output_dir.as_deref(),
        }
    }

    fn load_imports(
        &self,
        composite: &mut Composite,
        parent: GrammarId,
        parent_dir: &Path,
        diag: &mut Diagnostics,
    ) -> Result<(), FrontendError> {
        let imports: Vec<Import> = composite.get(parent).ast().imports.clone();
        for import in imports {
            // Diamonds and cycles reuse the grammar already loaded.
            if let Some(existing) = composite.find(&import.name) {
                composite.link_delegate(parent, existing);
                continue;
            }

            let Some(path) = self.locate_import(&import.name, parent_dir) else {
                return Err(FrontendError::Grammar {
                    problems: vec![Problem {
                        file: composite.get(parent).file().to_string(),
                        range: import.span,
                        message: format!("cannot find or open import grammar {}", import.name),
                    }],
                });
            };
            let text = fs::read_to_string(&path).map_err(|source| FrontendError::Io {
                path: path.clone(),
                source,
            })?;
            let file = path.display().to_string();
            diag.add_source(&file, &text);
            let ast = parse(&text, &file).map_err(|problems| FrontendError::Grammar { problems })?;

            let modifier = composite.root().default_rule_modifier().map(str::to_string);
            let delegate = Grammar::new(file, text, ast).with_default_rule_modifier(modifier.as_deref());
            tracing::debug!(grammar = delegate.name(), path = %path.display(), "loaded delegate");
            let id = composite.add_delegate(parent, delegate);

            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            self.load_imports(composite, id, &dir, diag)?;
        }
        Ok(())
    }
}

impl GrammarFrontend for BuiltinFrontend {
    fn parse(&self, request: &ParseRequest<'_>, diag: &mut Diagnostics) -> Result<Composite, FrontendError> {
        diag.add_source(request.file, request.text);
        let ast = parse(request.text, request.file).map_err(|problems| FrontendError::Grammar { problems })?;
        let root = Grammar::new(request.file, request.text, ast)
            .with_implicit_lexer(request.implicit_lexer)
            .with_default_rule_modifier(request.default_rule_modifier);

        let mut composite = Composite::new(root);
        if let Some(seed) = request.seed_vocab {
            composite.vocab_mut().import(seed);
        }
        self.load_imports(&mut composite, GrammarId::ROOT, request.parent_dir, diag)?;
        Ok(composite)
    }

    fn assign_token_types(&self, composite: &mut Composite, _diag: &mut Diagnostics) -> Result<(), FrontendError> {
        tokens::assign_token_types(composite, &self.vocab_dirs())
    }

    fn define_symbols(&self, composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError> {
        symbols::define_symbols(composite, diag)
    }

    fn build_nfas(&self, composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError> {
        nfa::build_nfas(composite, diag)
    }

    fn analyze(
        &self,
        composite: &mut Composite,
        id: GrammarId,
        tuning: &AnalysisTuning,
        diag: &mut Diagnostics,
    ) -> Result<(), FrontendError> {
        analysis::analyze(composite, id, tuning, diag)
    }

    fn print_grammar(&self, composite: &Composite, id: GrammarId) -> String {
        render::print_grammar(composite, id)
    }

    fn nfa_graphs(&self, composite: &Composite, id: GrammarId) -> Vec<DotGraph> {
        render::nfa_graphs(composite, id)
    }

    fn dfa_graphs(&self, composite: &Composite, id: GrammarId) -> Vec<DotGraph> {
        render::dfa_graphs(composite, id, &self.tuning)
    }

    fn report(&self, composite: &Composite) -> GrammarReport {
        render::report(composite)
    }
}
