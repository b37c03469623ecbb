//! Compilation order of the requested grammar files.
//!
//! A grammar that declares `tokenVocab = X` must be compiled after the grammar
//! that writes `X.tokens`. Nodes are file names and vocabulary file names;
//! edges point from a node to what it needs first.

use indexmap::{IndexMap, IndexSet};

use gramc_core::naming::vocab_file_name;

use crate::graph::{is_cycle, strongly_connected};
use crate::pipeline::HeaderScanner;
use crate::source::GrammarFile;

#[derive(Debug, thiserror::Error)]
pub enum SortError {
    /// Grammar files whose vocabularies depend on each other.
    #[error("dependency cycle among {}", .files.join(", "))]
    Cycle { files: Vec<String> },
}

/// Files ordered so that vocabulary producers come before their consumers.
///
/// Exactly the given files are returned; unrelated files keep their order.
/// A file whose header cannot be read is sorted without edges and left for
/// its own build to report.
pub fn sort_grammar_files<S>(files: &[GrammarFile], scanner: &S) -> Result<Vec<GrammarFile>, SortError>
where
    S: HeaderScanner + ?Sized,
{
    let mut graph: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for file in files {
        let node = file.raw().to_string();
        let needs = graph.entry(node.clone()).or_default();
        let header = match scanner.scan(file.path()) {
            Ok(header) => header,
            Err(e) => {
                tracing::debug!(grammar = %file, error = %e, "header unreadable, sorted without dependencies");
                continue;
            }
        };
        if let Some(vocab) = &header.token_vocab {
            needs.insert(vocab_file_name(vocab));
        }
        graph
            .entry(vocab_file_name(&header.name))
            .or_default()
            .insert(node);
    }

    let by_name: IndexMap<&str, &GrammarFile> = files.iter().map(|f| (f.raw(), f)).collect();
    let mut sorted = Vec::with_capacity(by_name.len());
    for scc in strongly_connected(&graph) {
        if is_cycle(&graph, &scc) {
            let files = by_name
                .keys()
                .filter(|name| scc.iter().any(|node| node == *name))
                .map(|name| name.to_string())
                .collect();
            return Err(SortError::Cycle { files });
        }
        sorted.extend(
            scc.iter()
                .filter_map(|node| by_name.get(node.as_str()))
                .map(|&f| f.clone()),
        );
    }
    tracing::debug!(order = ?sorted.iter().map(GrammarFile::raw).collect::<Vec<_>>(), "sorted grammar files");
    Ok(sorted)
}
