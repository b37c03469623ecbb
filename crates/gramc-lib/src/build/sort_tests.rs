use crate::build::{SortError, sort_grammar_files};
use crate::grammar::Scanner;
use crate::source::GrammarFile;
use crate::test_utils::Workspace;

fn files(ws: &Workspace, names: &[&str]) -> Vec<GrammarFile> {
    names.iter().map(|n| GrammarFile::new(*n, Some(ws.root()))).collect()
}

fn order(sorted: &[GrammarFile]) -> Vec<&str> {
    sorted.iter().map(GrammarFile::raw).collect()
}

#[test]
fn vocabulary_producer_comes_first() {
    let ws = Workspace::new();
    ws.write("Consumer.g", "parser grammar Consumer;\noptions { tokenVocab=Producer; }\nc : X ;\n");
    ws.write("Producer.g", "lexer grammar Producer;\nX : 'x' ;\n");
    ws.write("Other.g", "grammar Other;\no : 'o' ;\n");

    let sorted = sort_grammar_files(&files(&ws, &["Consumer.g", "Producer.g", "Other.g"]), &Scanner::new()).unwrap();

    assert_eq!(order(&sorted), ["Producer.g", "Consumer.g", "Other.g"]);
}

#[test]
fn chains_follow_vocabularies() {
    let ws = Workspace::new();
    ws.write("C.g", "parser grammar C;\noptions { tokenVocab=B; }\nc : X ;\n");
    ws.write("B.g", "parser grammar B;\noptions { tokenVocab=A; }\nb : X ;\n");
    ws.write("A.g", "lexer grammar A;\nX : 'x' ;\n");

    let sorted = sort_grammar_files(&files(&ws, &["C.g", "B.g", "A.g"]), &Scanner::new()).unwrap();

    assert_eq!(order(&sorted), ["A.g", "B.g", "C.g"]);
}

#[test]
fn unrelated_files_keep_their_order() {
    let ws = Workspace::new();
    ws.write("Z.g", "grammar Z;\nz : 'z' ;\n");
    ws.write("A.g", "grammar A;\na : 'a' ;\n");
    ws.write("sub/M.g", "grammar M;\nm : 'm' ;\n");

    let sorted = sort_grammar_files(&files(&ws, &["Z.g", "A.g", "sub/M.g"]), &Scanner::new()).unwrap();

    assert_eq!(order(&sorted), ["Z.g", "A.g", "sub/M.g"]);
}

#[test]
fn vocabulary_from_outside_the_set_is_ignored() {
    let ws = Workspace::new();
    ws.write("P.g", "parser grammar P;\noptions { tokenVocab=Prebuilt; }\np : X ;\n");

    let sorted = sort_grammar_files(&files(&ws, &["P.g"]), &Scanner::new()).unwrap();

    assert_eq!(order(&sorted), ["P.g"]);
}

#[test]
fn vocabulary_cycle_is_an_error() {
    let ws = Workspace::new();
    ws.write("A.g", "parser grammar A;\noptions { tokenVocab=B; }\na : X ;\n");
    ws.write("B.g", "parser grammar B;\noptions { tokenVocab=A; }\nb : X ;\n");

    let err = sort_grammar_files(&files(&ws, &["A.g", "B.g"]), &Scanner::new()).unwrap_err();
    let SortError::Cycle { files } = err else {
        panic!("expected a cycle, got {err:?}");
    };

    assert_eq!(files, ["A.g", "B.g"]);
}

#[test]
fn unreadable_files_are_sorted_without_dependencies() {
    let ws = Workspace::new();
    ws.write("P.g", "parser grammar P;\noptions { tokenVocab=L; }\np : X ;\n");
    ws.write("Bad.g", "this is not a grammar\n");
    ws.write("L.g", "lexer grammar L;\nX : 'x' ;\n");

    let names = ["P.g", "Missing.g", "Bad.g", "L.g"];
    let sorted = sort_grammar_files(&files(&ws, &names), &Scanner::new()).unwrap();

    assert_eq!(order(&sorted), ["L.g", "P.g", "Missing.g", "Bad.g"]);
}
