//! gramc: build orchestrator for grammar-driven recognizer generation.
//!
//! Given grammar files, the tool orders them so vocabulary producers come
//! first, skips the ones that are up to date in make mode, and drives each
//! through the frontend stages and code generation. A combined grammar's
//! lexer half is split out and compiled as a grammar of its own.
//!
//! # Example
//!
//! ```no_run
//! use gramc_lib::{Tool, ToolConfig};
//!
//! let config = ToolConfig::new().with_output_dir("generated");
//! let mut tool = Tool::new(config);
//! tool.add_grammar_file("grammars/Expr.g");
//! let report = tool.process();
//!
//! eprintln!("{}", tool.diagnostics().render());
//! println!("compiled {} file(s)", report.compiled.len());
//! if tool.error_count() > 0 {
//!     std::process::exit(1);
//! }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod build;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod source;
mod tool;

#[cfg(test)]
mod graph_tests;
#[cfg(test)]
mod output_tests;
#[cfg(test)]
mod test_utils;

pub use config::{AnalysisTuning, CodegenFlags, ToolConfig};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use pipeline::{BuildError, CodegenError, FrontendError};
pub use source::GrammarFile;
pub use tool::{ProcessReport, Tool};
