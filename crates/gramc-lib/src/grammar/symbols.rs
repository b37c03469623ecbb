//! Rule definitions and references across a composite.
//!
//! Errors (duplicate rules, rules of the wrong kind, undefined references) fail
//! the stage. Tokens a combined grammar uses but never defines only warn: the
//! generated lexer simply cannot produce them.

use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use gramc_core::GrammarKind;

use super::ast::{Atom, Block, Rule};
use super::{Composite, GrammarId, Stage};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::pipeline::{FrontendError, Problem};

pub fn define_symbols(composite: &mut Composite, diag: &mut Diagnostics) -> Result<(), FrontendError> {
    composite.require_all(Stage::TokensAssigned, "symbol definition")?;

    let mut problems = Vec::new();
    let mut owners: IndexMap<String, GrammarId> = IndexMap::new();

    for id in composite.breadth_first() {
        let grammar = composite.get(id);
        let mut seen: IndexSet<&str> = IndexSet::new();
        for rule in &grammar.ast().rules {
            let problem = |message: String| Problem {
                file: grammar.file().to_string(),
                range: rule.name_span,
                message,
            };
            if !seen.insert(&rule.name) {
                problems.push(problem(format!("rule {} redefinition", rule.name)));
                continue;
            }
            if rule.is_lexer_rule() && !grammar.kind().allows_lexer_rules() {
                problems.push(problem(format!(
                    "lexer rule {} not allowed in {} grammar",
                    rule.name,
                    grammar.kind()
                )));
            } else if !rule.is_lexer_rule() && !grammar.kind().allows_parser_rules() {
                problems.push(problem(format!(
                    "parser rule {} not allowed in lexer grammar",
                    rule.name
                )));
            }
            owners.entry(rule.name.clone()).or_insert(id);
        }
    }

    let declared: IndexSet<&str> = composite
        .grammars()
        .flat_map(|g| g.ast().tokens.iter().map(|t| t.name.as_str()))
        .collect();
    let has_vocab = composite.root().ast().option("tokenVocab").is_some();

    for id in composite.ids() {
        let grammar = composite.get(id);
        for rule in &grammar.ast().rules {
            let mut refs = Vec::new();
            collect_refs(&rule.block, &mut refs);
            for (atom, range) in refs {
                match atom {
                    Atom::RuleRef(name) if !owners.contains_key(name) => {
                        problems.push(Problem {
                            file: grammar.file().to_string(),
                            range,
                            message: format!("reference to undefined rule: {name}"),
                        });
                    }
                    Atom::TokenRef(name) if rule.is_lexer_rule() && !owners.contains_key(name) => {
                        problems.push(Problem {
                            file: grammar.file().to_string(),
                            range,
                            message: format!("reference to undefined rule: {name}"),
                        });
                    }
                    Atom::TokenRef(name)
                        if grammar.kind() == GrammarKind::Combined
                            && !rule.is_lexer_rule()
                            && !has_vocab
                            && !owners.contains_key(name)
                            && !declared.contains(name.as_str()) =>
                    {
                        diag.report(DiagnosticKind::GrammarWarning)
                            .message(format!("no lexer rule corresponding to token: {name}"))
                            .file(grammar.file())
                            .at(range)
                            .emit();
                    }
                    _ => {}
                }
            }
        }
    }

    if !problems.is_empty() {
        return Err(FrontendError::Grammar { problems });
    }

    tracing::debug!(grammar = composite.root().name(), rules = owners.len(), "symbols defined");
    composite.set_rule_owners(owners);
    composite.mark_all(Stage::SymbolsDefined);
    Ok(())
}

/// Rule and token references of a block, with the span of their element.
fn collect_refs<'a>(block: &'a Block, out: &mut Vec<(&'a Atom, TextRange)>) {
    for element in block.alternatives.iter().flat_map(|a| &a.elements) {
        collect_atom(&element.atom, element.span, out);
    }
}

fn collect_atom<'a>(atom: &'a Atom, span: TextRange, out: &mut Vec<(&'a Atom, TextRange)>) {
    match atom {
        Atom::RuleRef(_) | Atom::TokenRef(_) => out.push((atom, span)),
        Atom::Not(inner) => collect_atom(inner, span, out),
        Atom::Block(block) => collect_refs(block, out),
        Atom::Literal(_) | Atom::Range(..) | Atom::Wildcard | Atom::Action(_) => {}
    }
}

/// Rule that `name` resolves to from anywhere in the composite.
pub fn resolve_rule<'c>(composite: &'c Composite, name: &str) -> Option<(GrammarId, &'c Rule)> {
    let owner = composite.rule_owner(name)?;
    let rule = composite.get(owner).ast().rule(name)?;
    Some((owner, rule))
}
