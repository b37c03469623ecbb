use std::path::Path;

use indoc::indoc;

use super::tokens::{VocabDirs, assign_token_types};
use super::{BuiltinFrontend, Composite, GrammarId, Stage};
use crate::diagnostics::Diagnostics;
use crate::pipeline::FrontendError;
use crate::test_utils::{Workspace, parse_file, parse_text};

fn parsed(source: &str) -> Composite {
    let mut diag = Diagnostics::new();
    parse_text(&BuiltinFrontend::default(), source, &mut diag).unwrap()
}

fn no_dirs() -> VocabDirs<'static> {
    VocabDirs {
        lib_dir: Path::new("no-such-lib-dir"),
        output_dir: None,
    }
}

#[test]
fn assignment_order() {
    let mut composite = parsed(indoc! {"
        grammar Expr;
        tokens { PLUS='+'; KEYWORD; }
        expr : INT (PLUS INT)* ';' ;
        INT : '0'..'9'+ ;
    "});
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    insta::assert_snapshot!(composite.vocab().render(), @r"
    PLUS=4
    KEYWORD=5
    INT=6
    T__7=7
    '+'=4
    ';'=7
    ");
    assert_eq!(composite.root().stage(), Stage::TokensAssigned);
}

#[test]
fn combined_grammar_gets_lexer_text() {
    let mut composite = parsed(indoc! {"
        grammar Expr;
        tokens { PLUS='+'; }
        expr : INT (PLUS INT)* ';' ;
        INT : '0'..'9'+ ;
    "});
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    insta::assert_snapshot!(composite.lexer_grammar_text(GrammarId::ROOT).unwrap(), @r"
    lexer grammar ExprLexer;

    PLUS : '+' ;
    T__6 : ';' ;
    INT : '0'..'9'+ ;
    ");
}

#[test]
fn lexer_text_carries_language_and_lexer_actions() {
    let mut composite = parsed(indoc! {"
        grammar Calc;
        options { language=Java; }
        @lexer::header { package calc; }
        @parser::header { package calc; }
        stat : ID '=' ;
        ID : 'a'..'z'+ ;
    "});
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    insta::assert_snapshot!(composite.lexer_grammar_text(GrammarId::ROOT).unwrap(), @r"
    lexer grammar CalcLexer;
    options {
      language=Java;
    }
    @header { package calc; }

    T__5 : '=' ;
    ID : 'a'..'z'+ ;
    ");
}

#[test]
fn literal_with_own_lexer_rule_is_not_duplicated() {
    let mut composite = parsed(indoc! {"
        grammar G;
        a : '+' ;
        PLUS : '+' ;
    "});
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    assert_eq!(composite.vocab().literal_type("'+'"), composite.vocab().token_type("PLUS"));
    insta::assert_snapshot!(composite.lexer_grammar_text(GrammarId::ROOT).unwrap(), @r"
    lexer grammar GLexer;

    PLUS : '+' ;
    ");
}

#[test]
fn parser_grammar_has_no_lexer_text() {
    let mut composite = parsed("parser grammar P; a : 'x' B ;");
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    assert_eq!(composite.lexer_grammar_text(GrammarId::ROOT), None);
    assert_eq!(composite.vocab().token_type("B"), Some(5));
}

#[test]
fn token_vocab_is_imported_first() {
    let ws = Workspace::new();
    ws.write("Base.tokens", "ID=4\nNUM=5\n'+'=6\n");
    let mut composite = parsed(indoc! {"
        parser grammar P;
        options { tokenVocab=Base; }
        a : ID NEW '+' ;
    "});
    let dirs = VocabDirs {
        lib_dir: ws.root(),
        output_dir: None,
    };
    assign_token_types(&mut composite, &dirs).unwrap();

    let vocab = composite.vocab();
    assert_eq!(vocab.token_type("NUM"), Some(5));
    assert_eq!(vocab.token_type("NEW"), Some(7));
    assert_eq!(vocab.literal_type("'+'"), Some(6));
}

#[test]
fn token_vocab_falls_back_to_output_dir() {
    let ws = Workspace::new();
    let out = ws.path("out");
    let dirs = VocabDirs {
        lib_dir: ws.root(),
        output_dir: Some(&out),
    };

    assert_eq!(dirs.locate("Base"), out.join("Base.tokens"));
    ws.write("Base.tokens", "ID=4\n");
    assert_eq!(dirs.locate("Base"), ws.path("Base.tokens"));
}

#[test]
fn missing_token_vocab() {
    let mut composite = parsed("parser grammar P; options { tokenVocab=Missing; } a : ID ;");
    let err = assign_token_types(&mut composite, &no_dirs()).unwrap_err();
    let FrontendError::Grammar { problems } = err else {
        panic!("expected grammar problem, got {err:?}");
    };

    assert_eq!(problems[0].message, "cannot find tokens file ./Missing.tokens");
    assert_eq!(composite.root().stage(), Stage::Parsed);
}

#[test]
fn malformed_token_vocab() {
    let ws = Workspace::new();
    ws.write("Bad.tokens", "ID=4\nnonsense\n");
    let mut composite = parsed("parser grammar P; options { tokenVocab=Bad; } a : ID ;");
    let dirs = VocabDirs {
        lib_dir: ws.root(),
        output_dir: None,
    };
    let err = assign_token_types(&mut composite, &dirs).unwrap_err();

    insta::assert_snapshot!(err.to_string().replace(&ws.root().display().to_string(), "<dir>"), @"malformed vocabulary <dir>/Bad.tokens: line 2: expected `NAME=type`, found `nonsense`");
}

#[test]
fn delegate_literals_reach_root_lexer() {
    let ws = Workspace::new();
    ws.write("Sub.g", "parser grammar Sub;\ns : 'k' ;\n");
    let root = ws.write("Root.g", "grammar Root;\nimport Sub;\nr : s ID ;\nID : 'a'+ ;\n");
    let mut diag = Diagnostics::new();
    let mut composite = parse_file(&BuiltinFrontend::default(), &root, &mut diag).unwrap();
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    insta::assert_snapshot!(composite.lexer_grammar_text(GrammarId::ROOT).unwrap(), @r"
    lexer grammar RootLexer;

    T__5 : 'k' ;
    ID : 'a'+ ;
    ");
}

#[test]
fn lexer_delegates_are_imported_by_implicit_lexer() {
    let ws = Workspace::new();
    ws.write("Words.g", "lexer grammar Words;\nWORD : 'a'..'z'+ ;\n");
    let root = ws.write("Root.g", "grammar Root;\nimport Words;\nr : WORD ';' ;\n");
    let mut diag = Diagnostics::new();
    let mut composite = parse_file(&BuiltinFrontend::default(), &root, &mut diag).unwrap();
    assign_token_types(&mut composite, &no_dirs()).unwrap();

    insta::assert_snapshot!(composite.lexer_grammar_text(GrammarId::ROOT).unwrap(), @r"
    lexer grammar RootLexer;
    import Words;

    T__5 : ';' ;
    ");
}
