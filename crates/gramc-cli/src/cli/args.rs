//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so `build` and `deps` can share the
//! input and output options.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar files to process (positional, one or more).
pub fn grammars_arg() -> Arg {
    Arg::new("grammars")
        .value_name("GRAMMAR")
        .num_args(1..)
        .required(true)
        .help("Grammar files, in any order")
}

/// Output directory (-o/--output-dir).
pub fn output_dir_arg() -> Arg {
    Arg::new("output_dir")
        .short('o')
        .long("output-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("force_output_dir")
        .help("Write generated files under DIR, mirroring grammar subdirectories")
}

/// Output directory that flattens every grammar's output (--fo).
pub fn force_output_dir_arg() -> Arg {
    Arg::new("force_output_dir")
        .long("fo")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Write every generated file directly into DIR")
}

/// Directory grammar names are relative to (-i/--input-dir).
pub fn input_dir_arg() -> Arg {
    Arg::new("input_dir")
        .short('i')
        .long("input-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Resolve grammar names relative to DIR")
}

/// Library directory (--lib).
pub fn lib_dir_arg() -> Arg {
    Arg::new("lib_dir")
        .long("lib")
        .value_name("DIR")
        .help("Search DIR first for imported grammars and .tokens files")
}

/// Keep relative layout for absolute grammar paths (--relative-output).
pub fn relative_output_arg() -> Arg {
    Arg::new("relative_output")
        .long("relative-output")
        .action(ArgAction::SetTrue)
        .help("Mirror grammar directories under the output directory even for absolute paths")
}

/// Keep the split-out lexer grammar (--keep-lexer).
pub fn keep_lexer_arg() -> Arg {
    Arg::new("keep_lexer")
        .long("keep-lexer")
        .action(ArgAction::SetTrue)
        .help("Keep the lexer grammar generated from a combined grammar")
}

/// Only rebuild out-of-date grammars (--make).
pub fn make_arg() -> Arg {
    Arg::new("make")
        .long("make")
        .action(ArgAction::SetTrue)
        .help("Only build grammars whose outputs are missing or older than their inputs")
}

/// Generated recognizers emit debug events (--debug).
pub fn debug_arg() -> Arg {
    Arg::new("debug")
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Generate recognizers that emit debug events")
}

/// Generated recognizers trace rule entry and exit (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Generate recognizers that trace rule entry and exit")
}

/// Profiling hooks and grammar.stats (--profile).
pub fn profile_arg() -> Arg {
    Arg::new("profile")
        .long("profile")
        .action(ArgAction::SetTrue)
        .help("Generate profiling recognizers and append statistics to grammar.stats")
}

/// Print a report per grammar (--report).
pub fn report_arg() -> Arg {
    Arg::new("report")
        .long("report")
        .action(ArgAction::SetTrue)
        .help("Print a summary of each compiled grammar")
}

/// Print grammars without actions (--print).
pub fn print_arg() -> Arg {
    Arg::new("print")
        .long("print")
        .action(ArgAction::SetTrue)
        .help("Print each grammar with actions removed")
}

/// NFA graphs (--nfa).
pub fn nfa_arg() -> Arg {
    Arg::new("nfa")
        .long("nfa")
        .action(ArgAction::SetTrue)
        .help("Write a DOT graph of each rule's NFA")
}

/// DFA graphs (--dfa).
pub fn dfa_arg() -> Arg {
    Arg::new("dfa")
        .long("dfa")
        .action(ArgAction::SetTrue)
        .help("Write a DOT graph of each decision's lookahead DFA")
}

/// Rules default to public (--test-mode).
pub fn test_mode_arg() -> Arg {
    Arg::new("test_mode")
        .long("test-mode")
        .action(ArgAction::SetTrue)
        .help("Make rules without a modifier public in generated recognizers")
}

/// Test lookahead against EBNF exit branches (--no-prune).
pub fn no_prune_arg() -> Arg {
    Arg::new("no_prune")
        .long("no-prune")
        .action(ArgAction::SetTrue)
        .help("Check EBNF loop exit branches for overlapping lookahead")
}

/// One DFA edge per label (--no-collapse).
pub fn no_collapse_arg() -> Arg {
    Arg::new("no_collapse")
        .long("no-collapse")
        .action(ArgAction::SetTrue)
        .help("Do not collapse parallel DFA edges")
}

/// One accept state per edge (--no-merge).
pub fn no_merge_arg() -> Arg {
    Arg::new("no_merge")
        .long("no-merge")
        .action(ArgAction::SetTrue)
        .help("Do not merge DFA stop states")
}

/// Inline DFA size limit (--max-inline-dfa-states).
pub fn max_inline_dfa_states_arg() -> Arg {
    Arg::new("max_inline_dfa_states")
        .long("max-inline-dfa-states")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Emit decisions with more DFA states than N as tables")
}

/// Rule recursion limit during analysis (--max-rule-invocations).
pub fn max_rule_invocations_arg() -> Arg {
    Arg::new("max_rule_invocations")
        .long("max-rule-invocations")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Follow the same rule at most N times on one lookahead path")
}

/// DFA edge limit (--max-dfa-edges).
pub fn max_dfa_edges_arg() -> Arg {
    Arg::new("max_dfa_edges")
        .long("max-dfa-edges")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Draw at most N edges per DFA graph")
}

/// Per-decision analysis time limit (--conversion-timeout).
pub fn conversion_timeout_arg() -> Arg {
    Arg::new("conversion_timeout")
        .long("conversion-timeout")
        .value_name("MS")
        .value_parser(value_parser!(u64))
        .help("Give up analyzing a decision after MS milliseconds")
}

/// Template delimiters in generated code (--template-delimiters).
pub fn template_delimiters_arg() -> Arg {
    Arg::new("template_delimiters")
        .long("template-delimiters")
        .action(ArgAction::SetTrue)
        .help("Mark the start and end of every template in generated code")
}

/// Log each rule as it is analyzed (--watch-conversion).
pub fn watch_conversion_arg() -> Arg {
    Arg::new("watch_conversion")
        .long("watch-conversion")
        .action(ArgAction::SetTrue)
        .help("Log each rule before its decisions are analyzed")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the run summary as JSON")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for progress, -vv for details)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}
