use indexmap::{IndexMap, IndexSet};

use crate::graph::{is_cycle, strongly_connected};

/// `"a->b b"` declares node `a` with an edge to `b`, then node `b`.
fn graph(spec: &'static str) -> IndexMap<&'static str, IndexSet<&'static str>> {
    let mut g: IndexMap<_, IndexSet<_>> = IndexMap::new();
    for item in spec.split_whitespace() {
        match item.split_once("->") {
            Some((from, to)) => {
                g.entry(from).or_default().insert(to);
            }
            None => {
                g.entry(item).or_default();
            }
        }
    }
    g
}

#[test]
fn leaves_come_first() {
    let g = graph("a->b b->c c");
    assert_eq!(strongly_connected(&g), vec![vec!["c"], vec!["b"], vec!["a"]]);
}

#[test]
fn independent_nodes_keep_insertion_order() {
    let g = graph("x y z");
    assert_eq!(strongly_connected(&g), vec![vec!["x"], vec!["y"], vec!["z"]]);
}

#[test]
fn mutual_recursion_is_one_component() {
    let g = graph("a->b b->a c->a");
    let sccs = strongly_connected(&g);

    assert_eq!(sccs, vec![vec!["a", "b"], vec!["c"]]);
    assert!(is_cycle(&g, &sccs[0]));
    assert!(!is_cycle(&g, &sccs[1]));
}

#[test]
fn self_edge_is_a_cycle() {
    let g = graph("a->a");
    let sccs = strongly_connected(&g);
    assert!(is_cycle(&g, &sccs[0]));
}

#[test]
fn dangling_targets_are_ignored() {
    let g = graph("a->missing");
    assert_eq!(strongly_connected(&g), vec![vec!["a"]]);
}
