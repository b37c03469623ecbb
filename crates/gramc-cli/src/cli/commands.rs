//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Options that decide where grammars are read from and output goes.
fn with_location_args(cmd: Command) -> Command {
    cmd.arg(grammars_arg())
        .arg(output_dir_arg())
        .arg(force_output_dir_arg())
        .arg(input_dir_arg())
        .arg(lib_dir_arg())
        .arg(relative_output_arg())
        .arg(keep_lexer_arg())
        .arg(verbose_arg())
        .arg(color_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("gramc")
        .about("Build recognizers from grammar files")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(build_command())
        .subcommand(deps_command())
}

/// Compile grammar files.
pub fn build_command() -> Command {
    let cmd = Command::new("build")
        .about("Compile grammar files into recognizers")
        .override_usage(
            "\
  gramc build <GRAMMAR>...
  gramc build -o <DIR> <GRAMMAR>...
  gramc build --make -o <DIR> <GRAMMAR>...",
        )
        .after_help(
            r#"EXAMPLES:
  gramc build Expr.g                    # output next to the grammar
  gramc build -o gen grammars/Expr.g    # output in gen/grammars
  gramc build --fo gen a/L.g b/P.g      # everything directly in gen
  gramc build --make -o gen *.g         # skip up-to-date grammars
  gramc build --print --report Expr.g   # show grammar and summary"#,
        )
        .arg(make_arg())
        .arg(debug_arg())
        .arg(trace_arg())
        .arg(profile_arg())
        .arg(report_arg())
        .arg(print_arg())
        .arg(nfa_arg())
        .arg(dfa_arg())
        .arg(test_mode_arg())
        .arg(no_prune_arg())
        .arg(no_collapse_arg())
        .arg(no_merge_arg())
        .arg(max_inline_dfa_states_arg())
        .arg(max_rule_invocations_arg())
        .arg(max_dfa_edges_arg())
        .arg(conversion_timeout_arg())
        .arg(template_delimiters_arg())
        .arg(watch_conversion_arg())
        .arg(json_arg());

    with_location_args(cmd)
}

/// List build dependencies in makefile form.
pub fn deps_command() -> Command {
    let cmd = Command::new("deps")
        .about("Print `output : input` lines for each grammar without building")
        .after_help(
            r#"EXAMPLES:
  gramc deps -o gen Expr.g              # gen/ExprParser.rs : Expr.g ...
  gramc deps --lib lib P.g              # resolve imports in lib first"#,
        );

    with_location_args(cmd)
}
