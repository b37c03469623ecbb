mod cli;
mod commands;

use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

use cli::{BuildParams, DepsParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("build", m)) => {
            init_tracing(m);
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        Some(("deps", m)) => {
            init_tracing(m);
            let params = DepsParams::from_matches(m);
            commands::deps::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v` level.
fn init_tracing(m: &ArgMatches) {
    let level = match m.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gramc_lib={level},gramc={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
