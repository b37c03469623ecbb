//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` mirror what the user typed; their `Into<*Args>` impls assemble
//! the [`ToolConfig`] the command runs with.

use std::path::PathBuf;

use clap::ArgMatches;
use gramc_lib::{AnalysisTuning, ToolConfig};

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::deps::DepsArgs;

/// Options shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationParams {
    pub grammars: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub force_output_dir: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub lib_dir: Option<String>,
    pub relative_output: bool,
    pub keep_lexer: bool,
    pub verbose: u8,
    pub color: ColorChoice,
}

impl LocationParams {
    fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammars: m
                .get_many::<String>("grammars")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            output_dir: m.get_one::<PathBuf>("output_dir").cloned(),
            force_output_dir: m.get_one::<PathBuf>("force_output_dir").cloned(),
            input_dir: m.get_one::<PathBuf>("input_dir").cloned(),
            lib_dir: m.get_one::<String>("lib_dir").cloned(),
            relative_output: m.get_flag("relative_output"),
            keep_lexer: m.get_flag("keep_lexer"),
            verbose: m.get_count("verbose"),
            color: parse_color(m),
        }
    }

    fn config(&self) -> ToolConfig {
        let mut config = ToolConfig::new()
            .with_force_relative_output(self.relative_output)
            .with_delete_temp_lexer(!self.keep_lexer)
            .with_verbose(self.verbose > 0);
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(dir) = &self.force_output_dir {
            config = config.with_forced_output_dir(dir);
        }
        if let Some(dir) = &self.input_dir {
            config = config.with_input_dir(dir);
        }
        if let Some(dir) = &self.lib_dir {
            config = config.with_lib_dir(dir);
        }
        config
    }
}

pub struct BuildParams {
    pub location: LocationParams,
    pub make: bool,
    pub debug: bool,
    pub trace: bool,
    pub profile: bool,
    pub report: bool,
    pub print: bool,
    pub nfa: bool,
    pub dfa: bool,
    pub test_mode: bool,
    pub tuning: AnalysisTuning,
    pub json: bool,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let defaults = AnalysisTuning::default();
        let tuning = AnalysisTuning {
            prune_ebnf_exit_branches: !m.get_flag("no_prune"),
            collapse_parallel_edges: !m.get_flag("no_collapse"),
            merge_stop_states: !m.get_flag("no_merge"),
            max_inline_dfa_states: m
                .get_one::<usize>("max_inline_dfa_states")
                .copied()
                .unwrap_or(defaults.max_inline_dfa_states),
            max_rule_invocations: m
                .get_one::<usize>("max_rule_invocations")
                .copied()
                .unwrap_or(defaults.max_rule_invocations),
            max_dfa_edges: m
                .get_one::<usize>("max_dfa_edges")
                .copied()
                .unwrap_or(defaults.max_dfa_edges),
            conversion_timeout_ms: m
                .get_one::<u64>("conversion_timeout")
                .copied()
                .unwrap_or(defaults.conversion_timeout_ms),
            emit_template_delimiters: m.get_flag("template_delimiters"),
            watch_conversion: m.get_flag("watch_conversion"),
        };
        Self {
            location: LocationParams::from_matches(m),
            make: m.get_flag("make"),
            debug: m.get_flag("debug"),
            trace: m.get_flag("trace"),
            profile: m.get_flag("profile"),
            report: m.get_flag("report"),
            print: m.get_flag("print"),
            nfa: m.get_flag("nfa"),
            dfa: m.get_flag("dfa"),
            test_mode: m.get_flag("test_mode"),
            tuning,
            json: m.get_flag("json"),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        let config = p
            .location
            .config()
            .with_make(p.make)
            .with_debug(p.debug)
            .with_trace(p.trace)
            .with_profile(p.profile)
            .with_report(p.report)
            .with_print_grammar(p.print)
            .with_nfa_dot(p.nfa)
            .with_dfa_dot(p.dfa)
            .with_test_mode(p.test_mode)
            .with_tuning(p.tuning);
        Self {
            grammars: p.location.grammars,
            config,
            json: p.json,
            color: p.location.color.should_colorize(),
        }
    }
}

pub struct DepsParams {
    pub location: LocationParams,
}

impl DepsParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            location: LocationParams::from_matches(m),
        }
    }
}

impl From<DepsParams> for DepsArgs {
    fn from(p: DepsParams) -> Self {
        Self {
            config: p.location.config().with_depend(true),
            grammars: p.location.grammars,
            color: p.location.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
