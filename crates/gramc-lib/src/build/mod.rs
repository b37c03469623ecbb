//! Build planning: file order, up-to-date checks and dependency listing.

mod deps;
mod incremental;
mod sort;

#[cfg(test)]
mod incremental_tests;
#[cfg(test)]
mod sort_tests;

pub use deps::BuildDependencies;
pub use incremental::needs_build;
pub use sort::{SortError, sort_grammar_files};
