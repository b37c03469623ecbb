use std::fmt::Write;

use gramc_lib::{ProcessReport, Tool, ToolConfig};

pub struct BuildArgs {
    pub grammars: Vec<String>,
    pub config: ToolConfig,
    pub json: bool,
    pub color: bool,
}

pub fn run(args: BuildArgs) {
    let mut tool = Tool::new(args.config);
    for grammar in args.grammars {
        tool.add_grammar_file(grammar);
    }

    let report = tool.process();
    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: cannot serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report_text(&report));
    }

    super::finish(&tool, args.color);
}

/// Printed grammars, then reports, then the files make mode skipped.
pub fn report_text(report: &ProcessReport) -> String {
    let mut out = String::new();
    for printed in &report.printed {
        writeln!(out, "{printed}").expect("String write never fails");
    }
    for summary in &report.reports {
        writeln!(out, "{summary}").expect("String write never fails");
    }
    for skipped in &report.skipped {
        writeln!(out, "{skipped} is up to date").expect("String write never fails");
    }
    out
}
