pub mod build;
pub mod deps;

#[cfg(test)]
mod build_tests;

use gramc_lib::Tool;

/// Print collected diagnostics to stderr and exit with status 1 on errors.
fn finish(tool: &Tool, color: bool) {
    let diagnostics = tool.diagnostics();
    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.render_colored(color));
    }
    if tool.error_count() > 0 {
        std::process::exit(1);
    }
}
