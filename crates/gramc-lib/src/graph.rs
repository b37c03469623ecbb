//! Strongly connected components over small adjacency maps.
//!
//! Used for grammar-file ordering and for left-recursion detection. Both
//! graphs are tiny, so a recursive Tarjan walk is fine.

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

/// Components in reverse topological order: a component only points at
/// components that appear before it. Within the same rank, nodes keep the
/// order they were inserted into `graph`.
pub fn strongly_connected<K>(graph: &IndexMap<K, IndexSet<K>>) -> Vec<Vec<K>>
where
    K: Clone + Eq + Hash,
{
    let mut finder = SccFinder {
        graph,
        index: 0,
        stack: Vec::new(),
        on_stack: IndexSet::new(),
        indices: IndexMap::new(),
        lowlinks: IndexMap::new(),
        sccs: Vec::new(),
    };

    for node in graph.keys() {
        if !finder.indices.contains_key(node) {
            finder.strongconnect(node);
        }
    }

    finder
        .sccs
        .into_iter()
        .map(|scc| scc.into_iter().cloned().collect())
        .collect()
}

/// Whether a component is a real cycle: more than one node, or a self edge.
pub fn is_cycle<K>(graph: &IndexMap<K, IndexSet<K>>, scc: &[K]) -> bool
where
    K: Eq + Hash,
{
    match scc {
        [single] => graph.get(single).is_some_and(|out| out.contains(single)),
        _ => scc.len() > 1,
    }
}

struct SccFinder<'a, K> {
    graph: &'a IndexMap<K, IndexSet<K>>,
    index: usize,
    stack: Vec<&'a K>,
    on_stack: IndexSet<&'a K>,
    indices: IndexMap<&'a K, usize>,
    lowlinks: IndexMap<&'a K, usize>,
    sccs: Vec<Vec<&'a K>>,
}

impl<'a, K: Eq + Hash> SccFinder<'a, K> {
    fn strongconnect(&mut self, node: &'a K) {
        self.indices.insert(node, self.index);
        self.lowlinks.insert(node, self.index);
        self.index += 1;
        self.stack.push(node);
        self.on_stack.insert(node);

        if let Some(targets) = self.graph.get(node) {
            for target in targets {
                // Edges may point at nodes that never appear as keys.
                let Some((target, _)) = self.graph.get_key_value(target) else {
                    continue;
                };
                if !self.indices.contains_key(target) {
                    self.strongconnect(target);
                    let low = self.lowlinks[target].min(self.lowlinks[node]);
                    self.lowlinks.insert(node, low);
                } else if self.on_stack.contains(target) {
                    let low = self.indices[target].min(self.lowlinks[node]);
                    self.lowlinks.insert(node, low);
                }
            }
        }

        if self.lowlinks[node] == self.indices[node] {
            let mut scc = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack.swap_remove(w);
                let done = w == node;
                scc.push(w);
                if done {
                    break;
                }
            }
            scc.reverse();
            self.sccs.push(scc);
        }
    }
}
