//! Tool configuration.
//!
//! [`ToolConfig`] is assembled once (by the CLI or an embedding build tool)
//! and then only read. Analysis limits that used to be process-wide switches
//! live in [`AnalysisTuning`] and reach the frontend and code generator as
//! part of [`CodegenFlags`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

pub const DEFAULT_MAX_INLINE_DFA_STATES: usize = 60;
pub const DEFAULT_MAX_RULE_INVOCATIONS: usize = 4;
pub const DEFAULT_MAX_DFA_EDGES: usize = 65_534;
pub const DEFAULT_CONVERSION_TIMEOUT_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisTuning {
    /// Test lookahead against EBNF block exit branches when `false`.
    pub prune_ebnf_exit_branches: bool,
    pub collapse_parallel_edges: bool,
    pub merge_stop_states: bool,
    /// Decisions with more DFA states than this are emitted as tables.
    pub max_inline_dfa_states: usize,
    /// Max invocations of the same rule on one lookahead path.
    pub max_rule_invocations: usize,
    pub max_dfa_edges: usize,
    pub conversion_timeout_ms: u64,
    /// Wrap every emitted template in start/stop markers.
    pub emit_template_delimiters: bool,
    /// Log each rule before its decisions are analyzed.
    pub watch_conversion: bool,
}

impl Default for AnalysisTuning {
    fn default() -> Self {
        Self {
            prune_ebnf_exit_branches: true,
            collapse_parallel_edges: true,
            merge_stop_states: true,
            max_inline_dfa_states: DEFAULT_MAX_INLINE_DFA_STATES,
            max_rule_invocations: DEFAULT_MAX_RULE_INVOCATIONS,
            max_dfa_edges: DEFAULT_MAX_DFA_EDGES,
            conversion_timeout_ms: DEFAULT_CONVERSION_TIMEOUT_MS,
            emit_template_delimiters: false,
            watch_conversion: false,
        }
    }
}

/// Switches handed to the code generator for every recognizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodegenFlags {
    pub debug: bool,
    pub trace: bool,
    pub profile: bool,
    pub tuning: AnalysisTuning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub output_dir: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    /// Searched first for imported grammars and `.tokens` files.
    pub lib_dir: PathBuf,
    pub force_all_files_to_output_dir: bool,
    pub force_relative_output: bool,
    pub delete_temp_lexer: bool,
    pub make: bool,
    pub depend: bool,
    pub debug: bool,
    pub trace: bool,
    pub profile: bool,
    pub report: bool,
    pub print_grammar: bool,
    pub generate_nfa_dot: bool,
    pub generate_dfa_dot: bool,
    /// Rules default to `public` in generated recognizers.
    pub test_mode: bool,
    pub verbose: bool,
    pub tuning: AnalysisTuning,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            input_dir: None,
            lib_dir: PathBuf::from("."),
            force_all_files_to_output_dir: false,
            force_relative_output: false,
            delete_temp_lexer: true,
            make: false,
            depend: false,
            debug: false,
            trace: false,
            profile: false,
            report: false,
            print_grammar: false,
            generate_nfa_dot: false,
            generate_dfa_dot: false,
            test_mode: false,
            verbose: false,
            tuning: AnalysisTuning::default(),
        }
    }
}

impl ToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Like [`with_output_dir`](Self::with_output_dir), but every generated
    /// file lands directly in `dir`, whatever the grammar's location.
    pub fn with_forced_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self.force_all_files_to_output_dir = true;
        self
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    /// Trailing separators are dropped.
    pub fn with_lib_dir(mut self, dir: impl AsRef<str>) -> Self {
        let dir = dir.as_ref();
        let trimmed = dir.strip_suffix(['/', '\\']).filter(|d| !d.is_empty());
        self.lib_dir = PathBuf::from(trimmed.unwrap_or(dir));
        self
    }

    pub fn with_force_relative_output(mut self, value: bool) -> Self {
        self.force_relative_output = value;
        self
    }

    pub fn with_delete_temp_lexer(mut self, value: bool) -> Self {
        self.delete_temp_lexer = value;
        self
    }

    pub fn with_make(mut self, value: bool) -> Self {
        self.make = value;
        self
    }

    pub fn with_depend(mut self, value: bool) -> Self {
        self.depend = value;
        self
    }

    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    pub fn with_trace(mut self, value: bool) -> Self {
        self.trace = value;
        self
    }

    pub fn with_profile(mut self, value: bool) -> Self {
        self.profile = value;
        self
    }

    pub fn with_report(mut self, value: bool) -> Self {
        self.report = value;
        self
    }

    pub fn with_print_grammar(mut self, value: bool) -> Self {
        self.print_grammar = value;
        self
    }

    pub fn with_nfa_dot(mut self, value: bool) -> Self {
        self.generate_nfa_dot = value;
        self
    }

    pub fn with_dfa_dot(mut self, value: bool) -> Self {
        self.generate_dfa_dot = value;
        self
    }

    pub fn with_test_mode(mut self, value: bool) -> Self {
        self.test_mode = value;
        self
    }

    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    pub fn with_tuning(mut self, tuning: AnalysisTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn codegen_flags(&self) -> CodegenFlags {
        CodegenFlags {
            debug: self.debug,
            trace: self.trace,
            profile: self.profile,
            tuning: self.tuning.clone(),
        }
    }

    /// Base directory for files that never follow the grammar's location.
    pub fn base_output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }

    /// Check directories against the filesystem, reporting and repairing
    /// bad settings so the run can continue.
    pub fn validate(&mut self, diag: &mut Diagnostics) {
        if let Some(out) = &self.output_dir
            && out.is_file()
        {
            diag.report(DiagnosticKind::OutputDirIsFile)
                .message(out.display().to_string())
                .emit();
            self.output_dir = None;
            self.force_all_files_to_output_dir = false;
        }

        if !self.lib_dir.is_dir() {
            diag.report(DiagnosticKind::DirNotFound)
                .message(self.lib_dir.display().to_string())
                .emit();
            self.lib_dir = PathBuf::from(".");
        }
    }
}
