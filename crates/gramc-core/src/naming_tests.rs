use crate::GrammarKind;
use crate::naming::*;

#[test]
fn implicit_lexer_names() {
    assert_eq!(implicit_lexer_file_name("T"), "T__.g");
    assert_eq!(implicit_lexer_name("T"), "TLexer");
}

#[test]
fn vocab_names() {
    assert_eq!(vocab_file_name("Expr"), "Expr.tokens");
    assert!(is_vocab_file("Expr.tokens"));
    assert!(!is_vocab_file("Expr.g"));
}

#[test]
fn recognizer_names() {
    assert_eq!(recognizer_name("T", GrammarKind::Combined), "TParser");
    assert_eq!(recognizer_name("T", GrammarKind::Parser), "T");
    assert_eq!(recognizer_name("TLexer", GrammarKind::Lexer), "TLexer");
    assert_eq!(recognizer_name("Walker", GrammarKind::Tree), "Walker");
}

#[test]
fn literal_names() {
    assert_eq!(literal_token_name(6), "T__6");
}

#[test]
fn output_directory_of_raw_name() {
    assert_eq!(grammar_output_directory("T.g"), ".");
    assert_eq!(grammar_output_directory("sub/T.g"), "sub");
    assert_eq!(grammar_output_directory("a/b/T.g"), "a/b");
    assert_eq!(grammar_output_directory(r"a\T.g"), "a");
    assert_eq!(grammar_output_directory("/T.g"), "/");
}
