use gramc_lib::{Tool, ToolConfig};

pub struct DepsArgs {
    pub grammars: Vec<String>,
    pub config: ToolConfig,
    pub color: bool,
}

pub fn run(args: DepsArgs) {
    let mut tool = Tool::new(args.config);
    for grammar in args.grammars {
        tool.add_grammar_file(grammar);
    }

    let report = tool.process();
    for line in &report.dependencies {
        println!("{line}");
    }

    super::finish(&tool, args.color);
}
