use indoc::indoc;

use super::nfa::{DecisionKind, Label, Nfa};
use super::{BuiltinFrontend, Composite};
use crate::diagnostics::Diagnostics;
use crate::pipeline::GrammarFrontend;
use crate::test_utils::{compile_text, parse_text};

fn nfa_of(composite: &Composite) -> &Nfa {
    composite.root().nfa().expect("root has an NFA")
}

fn label(label: &Label) -> String {
    match label {
        Label::Epsilon => "e".to_string(),
        Label::Action => "act".to_string(),
        Label::Rule(name) => name.clone(),
        Label::Set(set) => {
            let ranges: Vec<String> = set
                .ranges()
                .iter()
                .map(|&(lo, hi)| if lo == hi { lo.to_string() } else { format!("{lo}..{hi}") })
                .collect();
            format!("{{{}}}", ranges.join(","))
        }
    }
}

fn dump(nfa: &Nfa) -> String {
    let mut out = String::new();
    for (i, state) in nfa.states().iter().enumerate() {
        out.push_str(&format!("{} s{i}", state.rule));
        if let Some(d) = state.decision {
            out.push_str(&format!(" d{d}"));
        }
        for edge in &state.edges {
            out.push_str(&format!(" {}->s{}", label(&edge.label), edge.target));
        }
        out.push('\n');
    }
    out
}

#[test]
fn sequence() {
    let (composite, _) = compile_text("parser grammar P; a : B C ;");
    let nfa = nfa_of(&composite);

    insta::assert_snapshot!(dump(nfa), @r"
    a s0 {4}->s2
    a s1
    a s2 {5}->s3
    a s3 e->s1
    ");
    assert_eq!(nfa.edge_count(), 3);
    assert!(nfa.decision_points().is_empty());
}

#[test]
fn optional_element() {
    let (composite, _) = compile_text("parser grammar P; a : B? C ;");

    insta::assert_snapshot!(dump(nfa_of(&composite)), @r"
    a s0 e->s2
    a s1
    a s2 d1 e->s3 e->s4
    a s3 {4}->s5
    a s4 {5}->s6
    a s5 e->s4
    a s6 e->s1
    ");
}

#[test]
fn block_inside_plus() {
    let (composite, _) = compile_text("parser grammar P; a : (B | C)+ ;");
    let nfa = nfa_of(&composite);

    insta::assert_snapshot!(dump(nfa), @r"
    a s0 e->s2
    a s1
    a s2 e->s3
    a s3 d1 e->s5 e->s7
    a s4 e->s9
    a s5 {4}->s6
    a s6 e->s4
    a s7 {5}->s8
    a s8 e->s4
    a s9 d2 e->s2 e->s10
    a s10 e->s1
    ");

    let kinds: Vec<_> = nfa.decision_points().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [DecisionKind::Block, DecisionKind::Plus]);
    assert_eq!(nfa.alternatives(&nfa.decision_points()[1]), [2, 10]);
}

#[test]
fn star_loops_back_to_decision() {
    let (composite, _) = compile_text("parser grammar P; a : B* ;");
    let nfa = nfa_of(&composite);
    let point = &nfa.decision_points()[0];

    assert_eq!(point.kind, DecisionKind::Star);
    assert!(point.kind.is_ebnf());
    let alternatives = nfa.alternatives(point);
    let &[entry, _end] = alternatives.as_slice() else {
        panic!("star decision has two alternatives");
    };
    let body_exit = nfa.state(entry).edges[0].target;
    assert_eq!(nfa.state(body_exit).edges[0].target, point.state);
}

#[test]
fn lexer_literals_are_character_chains() {
    let (composite, _) = compile_text(indoc! {"
        lexer grammar L;
        A : 'ab' | ~'x' ;
        fragment D : '0'..'9' ;
    "});

    insta::assert_snapshot!(dump(nfa_of(&composite)), @r"
    A s0 e->s2
    A s1
    A s2 d1 e->s4 e->s7
    A s3 e->s1
    A s4 {97}->s5
    A s5 {98}->s6
    A s6 e->s3
    A s7 {0..119,121..65535}->s8
    A s8 e->s3
    D s9 {48..57}->s11
    D s10
    D s11 e->s10
    ");
}

#[test]
fn rule_calls_and_actions() {
    let (composite, _) = compile_text("parser grammar P; a : b {act();} ; b : C ;");

    insta::assert_snapshot!(dump(nfa_of(&composite)), @r"
    a s0 b->s2
    a s1
    a s2 act->s3
    a s3 e->s1
    b s4 {4}->s6
    b s5
    b s6 e->s5
    ");
}

#[test]
fn parser_wildcard_spans_vocabulary() {
    let (composite, _) = compile_text("parser grammar P; a : B . ; b : C ;");
    let nfa = nfa_of(&composite);
    let start = nfa.rule("a").unwrap().start;
    let after_b = nfa.state(start).edges[0].target;

    assert_eq!(label(&nfa.state(after_b).edges[0].label), "{4..5}");
}

#[test]
fn combined_grammar_builds_parser_rules_only() {
    let (composite, _) = compile_text("grammar T; a : ID ; ID : 'x' ;");
    let nfa = nfa_of(&composite);

    assert!(nfa.rule("a").is_some());
    assert!(nfa.rule("ID").is_none());
    assert_eq!(nfa.rules().count(), 1);
}

#[test]
fn nfa_needs_symbols() {
    let frontend = BuiltinFrontend::default();
    let mut diag = Diagnostics::new();
    let mut composite = parse_text(&frontend, "grammar T; a : B ;", &mut diag).unwrap();
    frontend.assign_token_types(&mut composite, &mut diag).unwrap();
    let err = frontend.build_nfas(&mut composite, &mut diag).unwrap_err();

    insta::assert_snapshot!(
        err.to_string(),
        @"NFA construction on grammar T requires stage SymbolsDefined, found TokensAssigned"
    );
}
