//! Thompson-style NFA construction, one sub-automaton per rule.
//!
//! Parser rules match token types, lexer rules match characters. A rule
//! reference is an edge carrying the callee's name; its target is the state
//! reached once the callee returns, and the callee is resolved across the
//! composite when the NFA is walked. Every multi-alternative block and every
//! `?`, `*`, `+` suffix numbers a decision state whose epsilon edges, in order,
//! are its alternatives.

use indexmap::IndexMap;
use rowan::TextRange;

use gramc_core::{GrammarKind, MIN_TOKEN_TYPE, TokenVocabulary};

use super::ast::{Atom, Block, Rule, Suffix, literal_chars};
use super::intervals::IntervalSet;
use super::{Composite, Stage};
use crate::diagnostics::Diagnostics;
use crate::pipeline::FrontendError;

/// Largest character a lexer rule can match.
pub const MAX_CHAR: u32 = 0xFFFF;

pub type StateId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Epsilon,
    /// Token types in parser rules, characters in lexer rules.
    Set(IntervalSet),
    /// Invocation of `rule`; the edge target is the return state.
    Rule(String),
    /// Action or predicate; consumes nothing.
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub label: Label,
    pub target: StateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub rule: String,
    pub edges: Vec<Edge>,
    pub decision: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleNfa {
    pub start: StateId,
    pub stop: StateId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Block,
    Optional,
    Star,
    Plus,
}

impl DecisionKind {
    /// Decisions whose last alternative leaves an EBNF subrule.
    pub fn is_ebnf(self) -> bool {
        !matches!(self, DecisionKind::Block)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPoint {
    /// 1-based within the grammar.
    pub number: u32,
    pub rule: String,
    pub state: StateId,
    pub kind: DecisionKind,
    pub span: TextRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<State>,
    rules: IndexMap<String, RuleNfa>,
    decisions: Vec<DecisionPoint>,
}

impl Nfa {
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn rule(&self, name: &str) -> Option<RuleNfa> {
        self.rules.get(name).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, RuleNfa)> {
        self.rules.iter().map(|(name, r)| (name.as_str(), *r))
    }

    pub fn decision_points(&self) -> &[DecisionPoint] {
        &self.decisions
    }

    pub fn edge_count(&self) -> usize {
        self.states.iter().map(|s| s.edges.len()).sum()
    }

    /// Alternatives of a decision: targets of its state's edges, in order.
    pub fn alternatives(&self, decision: &DecisionPoint) -> Vec<StateId> {
        self.state(decision.state).edges.iter().map(|e| e.target).collect()
    }
}

pub fn build_nfas(composite: &mut Composite, _diag: &mut Diagnostics) -> Result<(), FrontendError> {
    for id in composite.ids() {
        composite.require(id, Stage::SymbolsDefined, "NFA construction")?;
        let grammar = composite.get(id);
        let lexer = grammar.kind() == GrammarKind::Lexer;
        let mut builder = Builder {
            nfa: Nfa::default(),
            vocab: composite.vocab(),
            lexer,
            rule: String::new(),
        };
        for rule in grammar.ast().rules.iter().filter(|r| r.is_lexer_rule() == lexer) {
            builder.rule(rule);
        }
        let nfa = builder.nfa;
        tracing::debug!(
            grammar = grammar.name(),
            states = nfa.states.len(),
            decisions = nfa.decisions.len(),
            "NFA built"
        );
        let grammar = composite.get_mut(id);
        grammar.set_nfa(nfa);
        grammar.set_stage(Stage::NfaBuilt);
    }
    Ok(())
}

struct Builder<'v> {
    nfa: Nfa,
    vocab: &'v TokenVocabulary,
    lexer: bool,
    rule: String,
}

impl Builder<'_> {
    fn rule(&mut self, rule: &Rule) {
        self.rule = rule.name.clone();
        let start = self.state();
        let stop = self.state();
        self.nfa.rules.insert(rule.name.clone(), RuleNfa { start, stop });
        let end = self.block(start, &rule.block);
        self.epsilon(end, stop);
    }

    fn block(&mut self, from: StateId, block: &Block) -> StateId {
        if let [alt] = block.alternatives.as_slice() {
            return alt
                .elements
                .iter()
                .fold(from, |cur, el| self.element(cur, &el.atom, el.suffix, el.span));
        }

        let decision = self.decision(DecisionKind::Block, block.span);
        self.epsilon(from, decision);
        let end = self.state();
        for alt in &block.alternatives {
            let entry = self.state();
            self.epsilon(decision, entry);
            let exit = alt
                .elements
                .iter()
                .fold(entry, |cur, el| self.element(cur, &el.atom, el.suffix, el.span));
            self.epsilon(exit, end);
        }
        end
    }

    fn element(&mut self, from: StateId, atom: &Atom, suffix: Suffix, span: TextRange) -> StateId {
        match suffix {
            Suffix::None => self.atom(from, atom),
            Suffix::Optional => {
                let decision = self.decision(DecisionKind::Optional, span);
                self.epsilon(from, decision);
                let entry = self.state();
                let end = self.state();
                self.epsilon(decision, entry);
                self.epsilon(decision, end);
                let exit = self.atom(entry, atom);
                self.epsilon(exit, end);
                end
            }
            Suffix::Star => {
                let decision = self.decision(DecisionKind::Star, span);
                self.epsilon(from, decision);
                let entry = self.state();
                let end = self.state();
                self.epsilon(decision, entry);
                self.epsilon(decision, end);
                let exit = self.atom(entry, atom);
                self.epsilon(exit, decision);
                end
            }
            Suffix::Plus => {
                let entry = self.state();
                self.epsilon(from, entry);
                let exit = self.atom(entry, atom);
                let decision = self.decision(DecisionKind::Plus, span);
                self.epsilon(exit, decision);
                let end = self.state();
                self.epsilon(decision, entry);
                self.epsilon(decision, end);
                end
            }
        }
    }

    fn atom(&mut self, from: StateId, atom: &Atom) -> StateId {
        match atom {
            Atom::Block(block) => self.block(from, block),
            Atom::RuleRef(name) => self.call(from, name),
            Atom::TokenRef(name) if self.lexer => self.call(from, name),
            Atom::Literal(lit) if self.lexer => literal_chars(lit)
                .into_iter()
                .fold(from, |cur, c| self.consume(cur, IntervalSet::of(c as u32))),
            Atom::Action(_) => {
                let to = self.state();
                self.edge(from, Label::Action, to);
                to
            }
            _ => {
                let set = self.set_of(atom);
                self.consume(from, set)
            }
        }
    }

    /// Set matched by a single-symbol atom.
    fn set_of(&self, atom: &Atom) -> IntervalSet {
        let (min, max) = self.universe();
        match atom {
            Atom::TokenRef(name) => self.vocab.token_type(name).map(IntervalSet::of).unwrap_or_default(),
            Atom::Literal(lit) if self.lexer => match literal_chars(lit).as_slice() {
                [c] => IntervalSet::of(*c as u32),
                _ => IntervalSet::new(),
            },
            Atom::Literal(lit) => self.vocab.literal_type(lit).map(IntervalSet::of).unwrap_or_default(),
            Atom::Range(lo, hi) => match (literal_chars(lo).first(), literal_chars(hi).first()) {
                (Some(&lo), Some(&hi)) if self.lexer => IntervalSet::range(lo as u32, hi as u32),
                _ => IntervalSet::new(),
            },
            Atom::Wildcard => IntervalSet::range(min, max),
            Atom::Not(inner) => self.set_of(inner).complement(min, max),
            Atom::Block(block) => {
                // `~('a'|'b')` style sets: union of single-symbol alternatives.
                let mut set = IntervalSet::new();
                for alt in &block.alternatives {
                    if let [el] = alt.elements.as_slice() {
                        set.add_all(&self.set_of(&el.atom));
                    }
                }
                set
            }
            Atom::RuleRef(_) | Atom::Action(_) => IntervalSet::new(),
        }
    }

    fn universe(&self) -> (u32, u32) {
        if self.lexer {
            (0, MAX_CHAR)
        } else {
            (MIN_TOKEN_TYPE, self.vocab.max_token_type().max(MIN_TOKEN_TYPE))
        }
    }

    fn consume(&mut self, from: StateId, set: IntervalSet) -> StateId {
        let to = self.state();
        self.edge(from, Label::Set(set), to);
        to
    }

    fn call(&mut self, from: StateId, rule: &str) -> StateId {
        let to = self.state();
        self.edge(from, Label::Rule(rule.to_string()), to);
        to
    }

    fn decision(&mut self, kind: DecisionKind, span: TextRange) -> StateId {
        let state = self.state();
        let number = self.nfa.decisions.len() as u32 + 1;
        self.nfa.states[state].decision = Some(number);
        self.nfa.decisions.push(DecisionPoint {
            number,
            rule: self.rule.clone(),
            state,
            kind,
            span,
        });
        state
    }

    fn state(&mut self) -> StateId {
        self.nfa.states.push(State {
            rule: self.rule.clone(),
            edges: Vec::new(),
            decision: None,
        });
        self.nfa.states.len() - 1
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.edge(from, Label::Epsilon, to);
    }

    fn edge(&mut self, from: StateId, label: Label, target: StateId) {
        self.nfa.states[from].edges.push(Edge { label, target });
    }
}
