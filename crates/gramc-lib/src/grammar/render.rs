//! Text renderings of a compiled composite: the grammar without actions,
//! Graphviz documents of NFAs and decisions, and the analysis report.

use std::collections::VecDeque;
use std::fmt::Write as _;

use indexmap::IndexSet;

use gramc_core::GrammarKind;

use super::analysis::LookSet;
use super::ast::{Alternative, Atom, Block, Element, GrammarAst, Rule};
use super::nfa::{Label, Nfa, RuleNfa};
use super::{Composite, GrammarId};
use crate::config::AnalysisTuning;
use crate::pipeline::{DotGraph, GrammarReport};

/// Grammar text reconstructed from the syntax tree, actions left out.
pub fn print_grammar(composite: &Composite, id: GrammarId) -> String {
    let ast = composite.get(id).ast();
    let mut out = String::new();
    write_header(ast, &mut out);
    for rule in &ast.rules {
        out.push('\n');
        write_rule(rule, &mut out);
    }
    out
}

fn write_header(ast: &GrammarAst, out: &mut String) {
    match ast.kind.keyword() {
        Some(keyword) => {
            let _ = writeln!(out, "{keyword} grammar {};", ast.name);
        }
        None => {
            let _ = writeln!(out, "grammar {};", ast.name);
        }
    }
    if !ast.options.is_empty() {
        out.push_str("options {\n");
        for (name, value) in &ast.options {
            let _ = writeln!(out, "  {name}={value};");
        }
        out.push_str("}\n");
    }
    if !ast.imports.is_empty() {
        let names: Vec<&str> = ast.imports.iter().map(|i| i.name.as_str()).collect();
        let _ = writeln!(out, "import {};", names.join(", "));
    }
    if !ast.tokens.is_empty() {
        out.push_str("tokens {\n");
        for spec in &ast.tokens {
            match &spec.literal {
                Some(lit) => {
                    let _ = writeln!(out, "  {}={lit};", spec.name);
                }
                None => {
                    let _ = writeln!(out, "  {};", spec.name);
                }
            }
        }
        out.push_str("}\n");
    }
}

fn write_rule(rule: &Rule, out: &mut String) {
    if let Some(modifier) = &rule.modifier {
        let _ = write!(out, "{modifier} ");
    }
    if rule.fragment {
        out.push_str("fragment ");
    }
    let _ = writeln!(out, "{}", rule.name);
    for (i, alt) in rule.block.alternatives.iter().enumerate() {
        let lead = if i == 0 { ':' } else { '|' };
        let text = alternative_text(alt);
        if text.is_empty() {
            let _ = writeln!(out, "    {lead}");
        } else {
            let _ = writeln!(out, "    {lead}   {text}");
        }
    }
    out.push_str("    ;\n");
}

fn alternative_text(alt: &Alternative) -> String {
    let parts: Vec<String> = alt.elements.iter().filter_map(element_text).collect();
    parts.join(" ")
}

fn element_text(element: &Element) -> Option<String> {
    let atom = atom_text(&element.atom)?;
    Some(format!("{atom}{}", element.suffix.as_str()))
}

fn atom_text(atom: &Atom) -> Option<String> {
    match atom {
        Atom::RuleRef(name) | Atom::TokenRef(name) | Atom::Literal(name) => Some(name.clone()),
        Atom::Range(lo, hi) => Some(format!("{lo}..{hi}")),
        Atom::Wildcard => Some(".".to_string()),
        Atom::Not(inner) => atom_text(inner).map(|t| format!("~{t}")),
        Atom::Block(block) => Some(format!("( {} )", block_text(block))),
        Atom::Action(_) => None,
    }
}

fn block_text(block: &Block) -> String {
    let alts: Vec<String> = block.alternatives.iter().map(alternative_text).collect();
    alts.join(" | ")
}

/// One graph per rule with an NFA, named `<grammar>.<rule>`.
pub fn nfa_graphs(composite: &Composite, id: GrammarId) -> Vec<DotGraph> {
    let grammar = composite.get(id);
    let Some(nfa) = grammar.nfa() else {
        return Vec::new();
    };
    let lexer = grammar.kind() == GrammarKind::Lexer;
    nfa.rules()
        .map(|(name, rule)| DotGraph {
            name: format!("{}.{name}", grammar.name()),
            dot: rule_dot(composite, nfa, rule, lexer),
        })
        .collect()
}

fn rule_dot(composite: &Composite, nfa: &Nfa, rule: RuleNfa, lexer: bool) -> String {
    let mut states = IndexSet::new();
    let mut queue = VecDeque::from([rule.start]);
    while let Some(s) = queue.pop_front() {
        if states.insert(s) {
            queue.extend(nfa.state(s).edges.iter().map(|e| e.target));
        }
    }

    let mut out = String::from("digraph NFA {\n  rankdir=LR;\n");
    for &s in &states {
        let shape = if s == rule.stop { "doublecircle" } else { "circle" };
        let label = match nfa.state(s).decision {
            Some(d) => format!("s{s}\\nd{d}"),
            None => format!("s{s}"),
        };
        let _ = writeln!(out, "  s{s} [shape={shape}, label=\"{label}\"];");
    }
    for &s in &states {
        for edge in &nfa.state(s).edges {
            let label = match &edge.label {
                Label::Epsilon => "&epsilon;".to_string(),
                Label::Action => "{...}".to_string(),
                Label::Rule(name) => name.clone(),
                Label::Set(set) => LookSet {
                    symbols: set.clone(),
                    eof: false,
                }
                .describe(composite.vocab(), lexer)
                .join(", "),
            };
            let style = if matches!(edge.label, Label::Rule(_)) {
                ", style=dashed"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  s{s} -> s{} [label=\"{}\"{style}];",
                edge.target,
                escape(&label)
            );
        }
    }
    out.push_str("}\n");
    out
}

/// One graph per analyzed decision, named `<grammar>.dec-<n>`.
pub fn dfa_graphs(composite: &Composite, id: GrammarId, tuning: &AnalysisTuning) -> Vec<DotGraph> {
    let grammar = composite.get(id);
    let lexer = grammar.kind() == GrammarKind::Lexer;
    grammar
        .decisions()
        .iter()
        .map(|decision| {
            let mut out = String::from("digraph DFA {\n  rankdir=LR;\n  s0 [shape=circle];\n");
            if decision.timed_out {
                out.push_str("  // analysis timed out; lookahead may be incomplete\n");
            }
            let mut edges = 0usize;
            let mut omitted = 0usize;
            let mut accept = 1usize;
            for (i, look) in decision.alternatives.iter().enumerate() {
                let labels = look.describe(composite.vocab(), lexer);
                if labels.is_empty() {
                    continue;
                }
                let groups: Vec<String> = if tuning.collapse_parallel_edges {
                    vec![labels.join(", ")]
                } else {
                    labels
                };
                let mut target = None;
                for label in groups {
                    if edges >= tuning.max_dfa_edges {
                        omitted += 1;
                        continue;
                    }
                    let state = match target {
                        Some(state) if tuning.merge_stop_states => state,
                        _ => {
                            let state = accept;
                            accept += 1;
                            let _ = writeln!(out, "  s{state} [shape=doublecircle, label=\"=>{}\"];", i + 1);
                            target = Some(state);
                            state
                        }
                    };
                    let _ = writeln!(out, "  s0 -> s{state} [label=\"{}\"];", escape(&label));
                    edges += 1;
                }
            }
            if omitted > 0 {
                let _ = writeln!(out, "  // {omitted} edges omitted");
            }
            out.push_str("}\n");
            DotGraph {
                name: format!("{}.dec-{}", grammar.name(), decision.number),
                dot: out,
            }
        })
        .collect()
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn report(composite: &Composite) -> GrammarReport {
    let root = composite.root();
    let decisions = root.decisions();
    GrammarReport {
        grammar: root.name().to_string(),
        kind: root.kind(),
        file: root.file().to_string(),
        language: root.language().map(str::to_string),
        rules: root.ast().rules.len(),
        lexer_rules: root.ast().lexer_rules().count(),
        decisions: decisions.len(),
        ll1_decisions: decisions.iter().filter(|d| d.is_ll1()).count(),
        ambiguous_decisions: decisions.iter().filter(|d| !d.conflicting.is_empty()).count(),
        timed_out_decisions: decisions.iter().filter(|d| d.timed_out).count(),
        tokens: composite.vocab().len(),
        delegates: composite
            .breadth_first()
            .into_iter()
            .skip(1)
            .map(|id| composite.get(id).name().to_string())
            .collect(),
    }
}
