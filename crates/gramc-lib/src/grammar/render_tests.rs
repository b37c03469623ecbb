use indoc::indoc;

use super::render::{dfa_graphs, nfa_graphs, print_grammar, report};
use super::{BuiltinFrontend, GrammarId};
use crate::config::AnalysisTuning;
use crate::diagnostics::Diagnostics;
use crate::test_utils::{compile_text, parse_text};

#[test]
fn printed_grammar_drops_actions() {
    let mut diag = Diagnostics::new();
    let source = indoc! {"
        grammar Expr;
        options { language=Java; }
        tokens { PLUS='+'; }
        @members { int depth; }
        expr : term (PLUS term)* {done();} ;
        term : INT | '(' expr ')' ;
        fragment DIGIT : '0'..'9' ;
        INT : DIGIT+ ;
    "};
    let composite = parse_text(&BuiltinFrontend::default(), source, &mut diag).unwrap();

    insta::assert_snapshot!(print_grammar(&composite, GrammarId::ROOT), @r"
    grammar Expr;
    options {
      language=Java;
    }
    tokens {
      PLUS='+';
    }

    expr
        :   term ( PLUS term )*
        ;

    term
        :   INT
        |   '(' expr ')'
        ;

    fragment DIGIT
        :   '0'..'9'
        ;

    INT
        :   DIGIT+
        ;
    ");
}

#[test]
fn printed_header_keeps_kind_and_modifiers() {
    let mut diag = Diagnostics::new();
    let composite = parse_text(
        &BuiltinFrontend::default(),
        "parser grammar P;\npublic a : ~B | ;\n",
        &mut diag,
    )
    .unwrap();

    insta::assert_snapshot!(print_grammar(&composite, GrammarId::ROOT), @r"
    parser grammar P;

    public a
        :   ~B
        |
        ;
    ");
}

#[test]
fn nfa_graph_per_rule() {
    let (composite, _) = compile_text("parser grammar P; a : B ; b : a ;");
    let graphs = nfa_graphs(&composite, GrammarId::ROOT);

    let names: Vec<&str> = graphs.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["P.a", "P.b"]);
    insta::assert_snapshot!(graphs[0].dot, @r#"
    digraph NFA {
      rankdir=LR;
      s0 [shape=circle, label="s0"];
      s2 [shape=circle, label="s2"];
      s1 [shape=doublecircle, label="s1"];
      s0 -> s2 [label="B"];
      s2 -> s1 [label="&epsilon;"];
    }
    "#);
    assert!(graphs[1].dot.contains(r#"[label="a", style=dashed]"#));
}

#[test]
fn nfa_graph_marks_decision_states() {
    let (composite, _) = compile_text("parser grammar P; a : B? ;");
    let graphs = nfa_graphs(&composite, GrammarId::ROOT);

    assert!(graphs[0].dot.contains(r#"s2 [shape=circle, label="s2\nd1"];"#));
}

const TWO_DECISIONS: &str = "parser grammar P; a : (B | C) D | E ;";

#[test]
fn dfa_graph_per_decision() {
    let (composite, _) = compile_text(TWO_DECISIONS);
    let graphs = dfa_graphs(&composite, GrammarId::ROOT, &AnalysisTuning::default());

    let names: Vec<&str> = graphs.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["P.dec-1", "P.dec-2"]);
    insta::assert_snapshot!(graphs[0].dot, @r#"
    digraph DFA {
      rankdir=LR;
      s0 [shape=circle];
      s1 [shape=doublecircle, label="=>1"];
      s0 -> s1 [label="B, C"];
      s2 [shape=doublecircle, label="=>2"];
      s0 -> s2 [label="E"];
    }
    "#);
}

#[test]
fn dfa_graph_without_collapsing_or_merging() {
    let (composite, _) = compile_text(TWO_DECISIONS);
    let tuning = AnalysisTuning {
        collapse_parallel_edges: false,
        merge_stop_states: false,
        ..AnalysisTuning::default()
    };
    let graphs = dfa_graphs(&composite, GrammarId::ROOT, &tuning);

    insta::assert_snapshot!(graphs[0].dot, @r#"
    digraph DFA {
      rankdir=LR;
      s0 [shape=circle];
      s1 [shape=doublecircle, label="=>1"];
      s0 -> s1 [label="B"];
      s2 [shape=doublecircle, label="=>1"];
      s0 -> s2 [label="C"];
      s3 [shape=doublecircle, label="=>2"];
      s0 -> s3 [label="E"];
    }
    "#);
}

#[test]
fn dfa_graph_edge_limit() {
    let (composite, _) = compile_text(TWO_DECISIONS);
    let tuning = AnalysisTuning {
        collapse_parallel_edges: false,
        max_dfa_edges: 1,
        ..AnalysisTuning::default()
    };
    let graphs = dfa_graphs(&composite, GrammarId::ROOT, &tuning);

    insta::assert_snapshot!(graphs[0].dot, @r#"
    digraph DFA {
      rankdir=LR;
      s0 [shape=circle];
      s1 [shape=doublecircle, label="=>1"];
      s0 -> s1 [label="B"];
      // 2 edges omitted
    }
    "#);
}

#[test]
fn report_summarizes_root() {
    let (composite, _) = compile_text(indoc! {"
        grammar Expr;
        options { language=Java; }
        expr : INT ('+' INT)* ;
        INT : '0'..'9'+ ;
    "});

    insta::assert_snapshot!(report(&composite).to_string(), @r"
    grammar Expr (combined) from T.g
    language: Java
    rules: 2 (1 lexer)
    tokens: 2
    decisions: 1 (1 LL(1), 0 ambiguous, 0 timed out)
    ");
}
