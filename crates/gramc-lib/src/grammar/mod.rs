//! Built-in grammar frontend.
//!
//! A grammar file and its imports are parsed into a [`Composite`], an arena
//! owning the root grammar and every delegate. The stages run across the whole
//! composite in a fixed order:
//!
//! 1. token types ([`tokens`])
//! 2. symbols ([`symbols`])
//! 3. NFAs ([`nfa`])
//! 4. decision analysis ([`analysis`]), per grammar, once every NFA exists
//!
//! Each grammar records the last stage it completed; running a stage early is
//! an internal error, not a panic.

pub mod analysis;
pub mod ast;
mod frontend;
mod intervals;
pub mod nfa;
mod parser;
mod render;
mod scanner;
pub mod symbols;
pub mod syntax;
pub mod tokens;

#[cfg(test)]
mod intervals_tests;
#[cfg(test)]
mod nfa_tests;
#[cfg(test)]
mod render_tests;
#[cfg(test)]
mod tokens_tests;

use gramc_core::{GrammarKind, TokenVocabulary};
use indexmap::IndexMap;

pub use analysis::Decision;
pub use ast::GrammarAst;
pub use frontend::BuiltinFrontend;
pub use intervals::IntervalSet;
pub use nfa::Nfa;
pub use parser::parse;
pub use scanner::Scanner;

use crate::pipeline::FrontendError;

/// Index of a grammar inside its [`Composite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrammarId(u32);

impl GrammarId {
    pub const ROOT: GrammarId = GrammarId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Last completed stage of a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum Stage {
    Parsed,
    TokensAssigned,
    SymbolsDefined,
    NfaBuilt,
    Analyzed,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    kind: GrammarKind,
    /// Name used for output resolution and diagnostics.
    file: String,
    source: String,
    ast: GrammarAst,
    stage: Stage,
    delegates: Vec<GrammarId>,
    implicit_lexer: bool,
    default_rule_modifier: Option<String>,
    nfa: Option<Nfa>,
    decisions: Vec<Decision>,
    lexer_text: Option<String>,
}

impl Grammar {
    pub fn new(file: impl Into<String>, source: impl Into<String>, ast: GrammarAst) -> Self {
        Self {
            name: ast.name.clone(),
            kind: ast.kind,
            file: file.into(),
            source: source.into(),
            ast,
            stage: Stage::Parsed,
            delegates: Vec::new(),
            implicit_lexer: false,
            default_rule_modifier: None,
            nfa: None,
            decisions: Vec::new(),
            lexer_text: None,
        }
    }

    pub fn with_implicit_lexer(mut self, value: bool) -> Self {
        self.implicit_lexer = value;
        self
    }

    pub fn with_default_rule_modifier(mut self, modifier: Option<&str>) -> Self {
        self.default_rule_modifier = modifier.map(str::to_string);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GrammarKind {
        self.kind
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &GrammarAst {
        &self.ast
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn direct_delegates(&self) -> &[GrammarId] {
        &self.delegates
    }

    pub fn is_implicit_lexer(&self) -> bool {
        self.implicit_lexer
    }

    pub fn default_rule_modifier(&self) -> Option<&str> {
        self.default_rule_modifier.as_deref()
    }

    pub fn nfa(&self) -> Option<&Nfa> {
        self.nfa.as_ref()
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Source of the lexer split out of a combined grammar, if it has one.
    pub fn lexer_grammar_text(&self) -> Option<&str> {
        self.lexer_text.as_deref().filter(|t| !t.is_empty())
    }

    pub fn language(&self) -> Option<&str> {
        self.ast.option("language")
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn set_nfa(&mut self, nfa: Nfa) {
        self.nfa = Some(nfa);
    }

    pub(crate) fn set_decisions(&mut self, decisions: Vec<Decision>) {
        self.decisions = decisions;
    }

    pub(crate) fn set_lexer_text(&mut self, text: Option<String>) {
        self.lexer_text = text;
    }
}

/// A root grammar and everything it imports, directly or not.
#[derive(Debug, Clone)]
pub struct Composite {
    grammars: Vec<Grammar>,
    vocab: TokenVocabulary,
    /// Grammar defining each rule; the first definition in breadth-first
    /// import order wins, so the root overrides its delegates.
    rule_owners: IndexMap<String, GrammarId>,
}

impl Composite {
    pub fn new(root: Grammar) -> Self {
        Self {
            grammars: vec![root],
            vocab: TokenVocabulary::new(),
            rule_owners: IndexMap::new(),
        }
    }

    /// Add `grammar` as a direct delegate of `parent`.
    pub fn add_delegate(&mut self, parent: GrammarId, grammar: Grammar) -> GrammarId {
        let id = GrammarId(self.grammars.len() as u32);
        self.grammars.push(grammar);
        self.grammars[parent.index()].delegates.push(id);
        id
    }

    /// Record an existing grammar as a delegate of `parent` as well.
    pub fn link_delegate(&mut self, parent: GrammarId, delegate: GrammarId) {
        let delegates = &mut self.grammars[parent.index()].delegates;
        if !delegates.contains(&delegate) {
            delegates.push(delegate);
        }
    }

    pub fn root_id(&self) -> GrammarId {
        GrammarId::ROOT
    }

    pub fn root(&self) -> &Grammar {
        &self.grammars[0]
    }

    pub fn get(&self, id: GrammarId) -> &Grammar {
        &self.grammars[id.index()]
    }

    pub fn get_mut(&mut self, id: GrammarId) -> &mut Grammar {
        &mut self.grammars[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = GrammarId> + use<> {
        (0..self.grammars.len() as u32).map(GrammarId)
    }

    pub fn grammars(&self) -> impl Iterator<Item = &Grammar> {
        self.grammars.iter()
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<GrammarId> {
        self.ids().find(|&id| self.get(id).name == name)
    }

    pub fn kind(&self, id: GrammarId) -> GrammarKind {
        self.get(id).kind
    }

    pub fn direct_delegates(&self, id: GrammarId) -> &[GrammarId] {
        &self.get(id).delegates
    }

    pub fn lexer_grammar_text(&self, id: GrammarId) -> Option<&str> {
        self.get(id).lexer_grammar_text()
    }

    pub fn vocab(&self) -> &TokenVocabulary {
        &self.vocab
    }

    pub fn vocab_mut(&mut self) -> &mut TokenVocabulary {
        &mut self.vocab
    }

    pub fn rule_owner(&self, rule: &str) -> Option<GrammarId> {
        self.rule_owners.get(rule).copied()
    }

    pub(crate) fn set_rule_owners(&mut self, owners: IndexMap<String, GrammarId>) {
        self.rule_owners = owners;
    }

    /// Grammars in breadth-first import order, root first.
    pub fn breadth_first(&self) -> Vec<GrammarId> {
        let mut order = vec![GrammarId::ROOT];
        let mut i = 0;
        while i < order.len() {
            for &d in self.direct_delegates(order[i]) {
                if !order.contains(&d) {
                    order.push(d);
                }
            }
            i += 1;
        }
        order
    }

    pub fn require(&self, id: GrammarId, required: Stage, operation: &'static str) -> Result<(), FrontendError> {
        let grammar = self.get(id);
        if grammar.stage < required {
            return Err(FrontendError::Stage {
                grammar: grammar.name.clone(),
                operation,
                required,
                found: grammar.stage,
            });
        }
        Ok(())
    }

    /// Fails unless every grammar in the composite reached `required`.
    pub fn require_all(&self, required: Stage, operation: &'static str) -> Result<(), FrontendError> {
        self.ids().try_for_each(|id| self.require(id, required, operation))
    }

    pub(crate) fn mark_all(&mut self, stage: Stage) {
        for g in &mut self.grammars {
            g.stage = stage;
        }
    }
}
