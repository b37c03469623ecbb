//! Decision analysis.
//!
//! Computes LL(1) lookahead for every decision of one grammar by walking the
//! NFAs of the whole composite: rule references jump into whichever grammar
//! owns the rule, and reaching the end of a rule with nothing to return to
//! continues at every call site. That walk is why analysis waits until every
//! grammar of the composite has its NFA.
//!
//! Left recursion is rejected first; overlapping alternatives only warn, the
//! earlier alternative wins.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use gramc_core::{GrammarKind, TokenVocabulary};

use super::intervals::IntervalSet;
use super::nfa::{DecisionKind, DecisionPoint, Label, Nfa, RuleNfa, StateId};
use super::{Composite, GrammarId, Stage};
use crate::config::AnalysisTuning;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::graph::{is_cycle, strongly_connected};
use crate::pipeline::{FrontendError, Problem};

/// Symbols that can start an alternative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookSet {
    pub symbols: IntervalSet,
    /// End of input can follow.
    pub eof: bool,
}

impl LookSet {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && !self.eof
    }

    pub fn intersection(&self, other: &LookSet) -> LookSet {
        LookSet {
            symbols: self.symbols.intersection(&other.symbols),
            eof: self.eof && other.eof,
        }
    }

    /// Human-readable labels: token names for parsers, quoted characters for lexers.
    pub fn describe(&self, vocab: &TokenVocabulary, lexer: bool) -> Vec<String> {
        let mut out = Vec::new();
        for &(lo, hi) in self.symbols.ranges() {
            if lexer {
                if lo == hi {
                    out.push(char_label(lo));
                } else {
                    out.push(format!("{}..{}", char_label(lo), char_label(hi)));
                }
                continue;
            }
            if hi - lo >= 8 {
                out.push(format!("{}..{}", token_label(vocab, lo), token_label(vocab, hi)));
                continue;
            }
            out.extend((lo..=hi).map(|t| token_label(vocab, t)));
        }
        if self.eof {
            out.push("EOF".to_string());
        }
        out
    }
}

fn token_label(vocab: &TokenVocabulary, ttype: u32) -> String {
    match vocab.name_of(ttype) {
        Some(name) => name.to_string(),
        None => ttype.to_string(),
    }
}

fn char_label(c: u32) -> String {
    match char::from_u32(c) {
        Some('\n') => "'\\n'".to_string(),
        Some('\r') => "'\\r'".to_string(),
        Some('\t') => "'\\t'".to_string(),
        Some('\'') => "'\\''".to_string(),
        Some(ch) if !ch.is_control() => format!("'{ch}'"),
        _ => format!("'\\u{c:04X}'"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub number: u32,
    pub rule: String,
    pub kind: DecisionKind,
    pub span: TextRange,
    /// Lookahead per alternative, in alternative order.
    pub alternatives: Vec<LookSet>,
    /// 1-based alternatives sharing lookahead with another.
    pub conflicting: Vec<usize>,
    pub timed_out: bool,
}

impl Decision {
    pub fn is_ll1(&self) -> bool {
        self.conflicting.is_empty() && !self.timed_out
    }

    /// States of the one-symbol DFA: the start state plus one per alternative.
    pub fn dfa_state_count(&self) -> usize {
        self.alternatives.len() + 1
    }
}

pub fn analyze(
    composite: &mut Composite,
    id: GrammarId,
    tuning: &AnalysisTuning,
    diag: &mut Diagnostics,
) -> Result<(), FrontendError> {
    composite.require_all(Stage::NfaBuilt, "decision analysis")?;

    let problems = left_recursion(composite, id);
    if !problems.is_empty() {
        return Err(FrontendError::Grammar { problems });
    }

    let grammar = composite.get(id);
    let decisions = match grammar.nfa() {
        Some(nfa) => {
            let walker = Walker::new(composite, tuning);
            let mut decisions = Vec::with_capacity(nfa.decision_points().len());
            let mut current_rule = None;
            for point in nfa.decision_points() {
                if tuning.watch_conversion && current_rule != Some(point.rule.as_str()) {
                    tracing::info!(grammar = grammar.name(), rule = %point.rule, "analyzing decisions");
                    current_rule = Some(point.rule.as_str());
                }
                decisions.push(walker.decision(id, nfa, point));
            }
            decisions
        }
        None => Vec::new(),
    };

    let lexer = grammar.kind() == GrammarKind::Lexer;
    for decision in decisions.iter().filter(|d| !d.conflicting.is_empty()) {
        let alts: Vec<String> = decision.conflicting.iter().map(usize::to_string).collect();
        let shared = shared_lookahead(decision);
        diag.report(DiagnosticKind::GrammarWarning)
            .message(format!(
                "decision can match input such as {} using multiple alternatives: {}; alternative {} wins",
                shared.describe(composite.vocab(), lexer).join(", "),
                alts.join(", "),
                decision.conflicting[0],
            ))
            .file(grammar.file())
            .at(decision.span)
            .emit();
    }
    for decision in decisions.iter().filter(|d| d.timed_out) {
        diag.report(DiagnosticKind::GrammarWarning)
            .message(format!(
                "analysis of decision {} in rule {} timed out after {}ms",
                decision.number, decision.rule, tuning.conversion_timeout_ms
            ))
            .file(grammar.file())
            .at(decision.span)
            .emit();
    }

    tracing::debug!(grammar = grammar.name(), decisions = decisions.len(), "decisions analyzed");
    let grammar = composite.get_mut(id);
    grammar.set_decisions(decisions);
    grammar.set_stage(Stage::Analyzed);
    Ok(())
}

fn shared_lookahead(decision: &Decision) -> LookSet {
    let mut shared = LookSet::default();
    for (i, a) in decision.alternatives.iter().enumerate() {
        for b in &decision.alternatives[i + 1..] {
            let common = a.intersection(b);
            shared.symbols.add_all(&common.symbols);
            shared.eof |= common.eof;
        }
    }
    shared
}

/// Pending return on the lookahead walk's call stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Frame {
    grammar: GrammarId,
    ret: StateId,
    callee: String,
}

struct Walker<'c> {
    composite: &'c Composite,
    tuning: &'c AnalysisTuning,
    /// Return states of every call to a rule, across the composite.
    callers: IndexMap<String, Vec<(GrammarId, StateId)>>,
}

impl<'c> Walker<'c> {
    fn new(composite: &'c Composite, tuning: &'c AnalysisTuning) -> Self {
        let mut callers: IndexMap<String, Vec<(GrammarId, StateId)>> = IndexMap::new();
        for id in composite.ids() {
            let Some(nfa) = composite.get(id).nfa() else {
                continue;
            };
            for state in nfa.states() {
                for edge in &state.edges {
                    if let Label::Rule(name) = &edge.label {
                        callers.entry(name.clone()).or_default().push((id, edge.target));
                    }
                }
            }
        }
        Self {
            composite,
            tuning,
            callers,
        }
    }

    fn decision(&self, id: GrammarId, nfa: &Nfa, point: &DecisionPoint) -> Decision {
        let deadline = Instant::now() + Duration::from_millis(self.tuning.conversion_timeout_ms);
        let mut timed_out = false;
        let alternatives: Vec<LookSet> = nfa
            .alternatives(point)
            .into_iter()
            .map(|target| {
                let (set, expired) = self.lookahead(id, target, deadline);
                timed_out |= expired;
                set
            })
            .collect();

        let compared = if point.kind.is_ebnf() && self.tuning.prune_ebnf_exit_branches {
            alternatives.len().saturating_sub(1)
        } else {
            alternatives.len()
        };
        let mut conflicting = IndexSet::new();
        for i in 0..compared {
            for j in i + 1..compared {
                if !alternatives[i].intersection(&alternatives[j]).is_empty() {
                    conflicting.insert(i + 1);
                    conflicting.insert(j + 1);
                }
            }
        }
        let mut conflicting: Vec<usize> = conflicting.into_iter().collect();
        conflicting.sort_unstable();

        Decision {
            number: point.number,
            rule: point.rule.clone(),
            kind: point.kind,
            span: point.span,
            alternatives,
            conflicting,
            timed_out,
        }
    }

    /// First symbols reachable from `start`; the flag is set when the walk
    /// hit the deadline and the set may be incomplete.
    fn lookahead(&self, id: GrammarId, start: StateId, deadline: Instant) -> (LookSet, bool) {
        let mut out = LookSet::default();
        let mut visited: HashSet<(GrammarId, StateId, Vec<Frame>)> = HashSet::new();
        let mut work = vec![(id, start, Vec::<Frame>::new())];

        while let Some((g, s, mut stack)) = work.pop() {
            if Instant::now() > deadline {
                return (out, true);
            }
            if !visited.insert((g, s, stack.clone())) {
                continue;
            }
            let Some(nfa) = self.composite.get(g).nfa() else {
                continue;
            };
            let state = nfa.state(s);

            if nfa.rule(&state.rule).is_some_and(|r| r.stop == s) {
                match stack.pop() {
                    Some(frame) => work.push((frame.grammar, frame.ret, stack.clone())),
                    None => match self.callers.get(&state.rule) {
                        Some(sites) => work.extend(sites.iter().map(|&(cg, ret)| (cg, ret, Vec::new()))),
                        None => out.eof = true,
                    },
                }
            }

            for edge in &state.edges {
                match &edge.label {
                    Label::Epsilon | Label::Action => work.push((g, edge.target, stack.clone())),
                    Label::Set(set) => out.symbols.add_all(set),
                    Label::Rule(name) => {
                        let depth = stack.iter().filter(|f| &f.callee == name).count();
                        if depth >= self.tuning.max_rule_invocations {
                            continue;
                        }
                        let Some((callee, rule)) = rule_nfa(self.composite, name) else {
                            continue;
                        };
                        let mut inner = stack.clone();
                        inner.push(Frame {
                            grammar: g,
                            ret: edge.target,
                            callee: name.clone(),
                        });
                        work.push((callee, rule.start, inner));
                    }
                }
            }
        }
        (out, false)
    }
}

/// NFA of the rule `name` resolves to.
fn rule_nfa(composite: &Composite, name: &str) -> Option<(GrammarId, RuleNfa)> {
    let owner = composite.rule_owner(name)?;
    let rule = composite.get(owner).nfa()?.rule(name)?;
    Some((owner, rule))
}

/// Left-recursive rule cycles involving a rule of grammar `id`.
fn left_recursion(composite: &Composite, id: GrammarId) -> Vec<Problem> {
    let rules: IndexMap<&str, (GrammarId, RuleNfa)> = composite
        .ids()
        .filter_map(|g| composite.get(g).nfa().map(|nfa| (g, nfa)))
        .flat_map(|(g, nfa)| nfa.rules().map(move |(name, r)| (name, (g, r))))
        .filter(|(name, (g, _))| composite.rule_owner(name) == Some(*g))
        .collect();

    let mut nullable: IndexSet<String> = IndexSet::new();
    loop {
        let mut changed = false;
        for (&name, &(g, rule)) in &rules {
            if !nullable.contains(name) && left_walk(composite, g, rule, &nullable).0 {
                nullable.insert(name.to_string());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let graph: IndexMap<String, IndexSet<String>> = rules
        .iter()
        .map(|(&name, &(g, rule))| (name.to_string(), left_walk(composite, g, rule, &nullable).1))
        .collect();

    let grammar = composite.get(id);
    let mut problems = Vec::new();
    for scc in strongly_connected(&graph) {
        if !is_cycle(&graph, &scc) {
            continue;
        }
        let Some(anchor) = scc.iter().find_map(|name| grammar.ast().rule(name)) else {
            continue;
        };
        let message = match scc.as_slice() {
            [single] => format!("rule {single} is left-recursive"),
            _ => format!("rules {} are mutually left-recursive", scc.join(", ")),
        };
        problems.push(Problem {
            file: grammar.file().to_string(),
            range: anchor.name_span,
            message,
        });
    }
    problems
}

/// Walk from the start of `rule` without consuming input. Returns whether its
/// end is reachable and which rules it can call in that position.
fn left_walk(
    composite: &Composite,
    g: GrammarId,
    rule: RuleNfa,
    nullable: &IndexSet<String>,
) -> (bool, IndexSet<String>) {
    let mut calls = IndexSet::new();
    let mut reaches_stop = false;
    let Some(nfa) = composite.get(g).nfa() else {
        return (reaches_stop, calls);
    };
    let mut visited = HashSet::new();
    let mut work = vec![rule.start];
    while let Some(s) = work.pop() {
        if !visited.insert(s) {
            continue;
        }
        if s == rule.stop {
            reaches_stop = true;
        }
        for edge in &nfa.state(s).edges {
            match &edge.label {
                Label::Epsilon | Label::Action => work.push(edge.target),
                Label::Rule(name) => {
                    calls.insert(name.clone());
                    if nullable.contains(name) {
                        work.push(edge.target);
                    }
                }
                Label::Set(_) => {}
            }
        }
    }
    (reaches_stop, calls)
}
