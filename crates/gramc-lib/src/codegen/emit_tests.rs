use indoc::indoc;

use super::{RecognizerEmitter, Target, emit_recognizer, emit_vocab, recognizer_name_of};
use crate::config::{AnalysisTuning, CodegenFlags, ToolConfig};
use crate::diagnostics::Diagnostics;
use crate::grammar::{BuiltinFrontend, Composite, GrammarId};
use crate::output::{OutputSettings, OutputWriter};
use crate::pipeline::{CodeGenerator, CodegenError, FrontendError, GrammarFrontend, ParseRequest};
use crate::test_utils::{Workspace, compile_text, parse_file};

fn emit(composite: &Composite, flags: &CodegenFlags) -> String {
    let language = composite.root().language();
    let target = Target::from_language(language).unwrap();
    emit_recognizer(composite, GrammarId::ROOT, flags, target).replace(env!("CARGO_PKG_VERSION"), "<version>")
}

fn run_stages(frontend: &BuiltinFrontend, composite: &mut Composite, diag: &mut Diagnostics) {
    frontend.assign_token_types(composite, diag).unwrap();
    frontend.define_symbols(composite, diag).unwrap();
    frontend.build_nfas(composite, diag).unwrap();
    for id in composite.ids() {
        frontend.analyze(composite, id, &AnalysisTuning::default(), diag).unwrap();
    }
}

#[test]
fn rust_parser_skeleton() {
    let (composite, _) = compile_text(indoc! {"
        parser grammar P;
        public a : B | C ;
        b : a ;
    "});

    insta::assert_snapshot!(emit(&composite, &CodegenFlags::default()), @r"
    // Generated by gramc <version> from T.g. Do not edit.

    pub const EOF: i32 = -1;
    pub const B: i32 = 4;
    pub const C: i32 = 5;

    pub struct P {
        base: Parser,
    }

    impl P {

        pub fn a(&mut self) -> Result<(), RecognitionError> {
            // decision 1 (LL(1), inline)
            //   alt 1 on B
            //   alt 2 on C
            Ok(())
        }

        fn b(&mut self) -> Result<(), RecognitionError> {
            Ok(())
        }
    }
    ");
}

#[test]
fn java_with_every_hook_and_delimiters() {
    let (composite, _) = compile_text(indoc! {"
        parser grammar P;
        options { language=Java; }
        a : B? ;
    "});
    let flags = CodegenFlags {
        debug: true,
        trace: true,
        profile: true,
        tuning: AnalysisTuning {
            emit_template_delimiters: true,
            ..AnalysisTuning::default()
        },
    };

    insta::assert_snapshot!(emit(&composite, &flags), @r#"
    // Generated by gramc <version> from T.g. Do not edit.

    // >>> tokens
    public static final int EOF = -1;
    public static final int B = 4;
    // <<< tokens

    public class P extends Parser {
        private DebugEventListener debug_listener;
        private Profiler profiler;

    // >>> rule a
        private void a() {
            trace_in("a");
            enter_rule("a");
            profile_decision(1);
            // decision 1 (LL(1), inline)
            //   alt 1 on B
            //   alt 2 on EOF
            exit_rule("a");
            trace_out("a");
        }
    // <<< rule a
    }
    "#);
}

#[test]
fn csharp_lexer_methods() {
    let (composite, _) = compile_text(indoc! {"
        lexer grammar L;
        options { language=CSharp2; }
        A : 'a' ;
        fragment D : '0'..'9' ;
    "});

    insta::assert_snapshot!(emit(&composite, &CodegenFlags::default()), @r"
    // Generated by gramc <version> from T.g. Do not edit.

    public const int EOF = -1;
    public const int A = 4;

    public partial class L : Lexer {

        private void mA() {
        }

        private void mD() {
        }
    }
    ");
}

#[test]
fn large_decisions_become_tables() {
    let (composite, _) = compile_text("parser grammar P; a : B | C ;");
    let flags = CodegenFlags {
        tuning: AnalysisTuning {
            max_inline_dfa_states: 2,
            ..AnalysisTuning::default()
        },
        ..CodegenFlags::default()
    };

    assert!(emit(&composite, &flags).contains("// decision 1 (LL(1), table)"));
}

#[test]
fn default_rule_modifier_applies_to_unmarked_rules() {
    let frontend = BuiltinFrontend::default();
    let mut diag = Diagnostics::new();
    let request = ParseRequest {
        file: "P.g",
        path: std::path::Path::new("P.g"),
        parent_dir: std::path::Path::new("."),
        text: "parser grammar P;\nprotected a : B ;\nb : C ;\n",
        implicit_lexer: false,
        default_rule_modifier: Some("public"),
        seed_vocab: None,
    };
    let mut composite = frontend.parse(&request, &mut diag).unwrap();
    run_stages(&frontend, &mut composite, &mut diag);
    let text = emit(&composite, &CodegenFlags::default());

    assert!(text.contains("    pub(crate) fn a(&mut self)"));
    assert!(text.contains("    pub fn b(&mut self)"));
}

#[test]
fn target_from_language() {
    assert_eq!(Target::from_language(None).unwrap(), Target::Rust);
    assert_eq!(Target::from_language(Some("CSharp3")).unwrap(), Target::CSharp);
    assert_eq!(Target::Java.extension(), ".java");

    let err = Target::from_language(Some("Cobol")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown target language `Cobol`");
}

#[test]
fn delegates_are_named_after_root_recognizer() {
    let ws = Workspace::new();
    ws.write("Sub.g", "parser grammar Sub;\ns : S ;\n");
    let top = ws.write("Top.g", "grammar Top;\nimport Sub;\nt : s ;\nS : 's' ;\n");
    let mut diag = Diagnostics::new();
    let composite = parse_file(&BuiltinFrontend::default(), &top, &mut diag).unwrap();
    let sub = composite.find("Sub").unwrap();

    assert_eq!(recognizer_name_of(&composite, GrammarId::ROOT), "TopParser");
    assert_eq!(recognizer_name_of(&composite, sub), "TopParser_Sub");
}

#[test]
fn generate_writes_recognizer_and_vocab() {
    let ws = Workspace::new();
    let (composite, _) = compile_text("parser grammar P; a : B ;");
    let config = ToolConfig::new().with_output_dir(ws.path("out"));
    let out = OutputWriter::new(OutputSettings::new(&config, "."));

    let written = RecognizerEmitter::new()
        .generate(&composite, GrammarId::ROOT, &CodegenFlags::default(), &out)
        .unwrap();

    assert_eq!(written, [ws.out("P.rs"), ws.out("P.tokens")]);
    assert_eq!(ws.read(&ws.out("P.tokens")), emit_vocab(&composite));
    assert_eq!(ws.read(&ws.out("P.tokens")), "B=4\n");
}

#[test]
fn generate_requires_analysis() {
    let ws = Workspace::new();
    let frontend = BuiltinFrontend::default();
    let mut diag = Diagnostics::new();
    let mut composite = crate::test_utils::parse_text(&frontend, "parser grammar P; a : B ;", &mut diag).unwrap();
    frontend.assign_token_types(&mut composite, &mut diag).unwrap();
    let config = ToolConfig::new().with_output_dir(ws.path("out"));
    let out = OutputWriter::new(OutputSettings::new(&config, "."));

    let err = RecognizerEmitter::new()
        .generate(&composite, GrammarId::ROOT, &CodegenFlags::default(), &out)
        .unwrap_err();

    assert!(matches!(err, CodegenError::Frontend(FrontendError::Stage { .. })));
    assert!(!ws.out("P.rs").exists());
}
