//! Recognizer and vocabulary text.
//!
//! The recognizer is a skeleton: token constants, one method per rule and the
//! lookahead of every decision. Debug, trace and profile switches add their
//! hooks to each rule.

use gramc_core::GrammarKind;

use super::{Target, recognizer_name_of};
use crate::config::CodegenFlags;
use crate::grammar::analysis::Decision;
use crate::grammar::ast::Rule;
use crate::grammar::{Composite, Grammar, GrammarId};

/// Contents of the composite's `.tokens` file.
pub fn emit_vocab(composite: &Composite) -> String {
    composite.vocab().render()
}

pub fn emit_recognizer(composite: &Composite, id: GrammarId, flags: &CodegenFlags, target: Target) -> String {
    let grammar = composite.get(id);
    let name = recognizer_name_of(composite, id);
    let mut out = String::new();

    out.push_str(&format!(
        "// Generated by gramc {} from {}. Do not edit.\n\n",
        env!("CARGO_PKG_VERSION"),
        grammar.file()
    ));
    if grammar.is_implicit_lexer() {
        out.push_str("// Lexer rules split out of a combined grammar.\n\n");
    }

    let delimit = flags.tuning.emit_template_delimiters;
    section(&mut out, delimit, "tokens", |out| emit_tokens(composite, target, out));
    out.push('\n');

    let mut fields = Vec::new();
    if flags.debug {
        fields.push(("debug_listener", "DebugEventListener"));
    }
    if flags.profile {
        fields.push(("profiler", "Profiler"));
    }
    out.push_str(&class_open(target, &name, grammar.kind(), &fields));

    let lexer = grammar.kind() == GrammarKind::Lexer;
    for rule in grammar.ast().rules.iter().filter(|r| r.is_lexer_rule() == lexer) {
        out.push('\n');
        section(&mut out, delimit, &format!("rule {}", rule.name), |out| {
            emit_rule(composite, grammar, rule, flags, target, out)
        });
    }
    out.push_str("}\n");
    out
}

/// Wrap template output in start/stop markers when requested.
fn section(out: &mut String, delimit: bool, name: &str, body: impl FnOnce(&mut String)) {
    if delimit {
        out.push_str(&format!("// >>> {name}\n"));
    }
    body(out);
    if delimit {
        out.push_str(&format!("// <<< {name}\n"));
    }
}

fn emit_tokens(composite: &Composite, target: Target, out: &mut String) {
    out.push_str(&constant(target, "EOF", -1));
    for (name, ttype) in composite.vocab().names() {
        out.push_str(&constant(target, name, i64::from(ttype)));
    }
}

fn constant(target: Target, name: &str, value: i64) -> String {
    match target {
        Target::Rust => format!("pub const {name}: i32 = {value};\n"),
        Target::Java => format!("public static final int {name} = {value};\n"),
        Target::CSharp => format!("public const int {name} = {value};\n"),
    }
}

/// Type declaration with its fields, left open for the rule methods.
fn class_open(target: Target, name: &str, kind: GrammarKind, fields: &[(&str, &str)]) -> String {
    let base = match kind {
        GrammarKind::Lexer => "Lexer",
        GrammarKind::Tree => "TreeParser",
        GrammarKind::Parser | GrammarKind::Combined => "Parser",
    };
    let mut out = match target {
        Target::Rust => format!("pub struct {name} {{\n    base: {base},\n"),
        Target::Java => format!("public class {name} extends {base} {{\n"),
        Target::CSharp => format!("public partial class {name} : {base} {{\n"),
    };
    for (field, ty) in fields {
        match target {
            Target::Rust => out.push_str(&format!("    {field}: {ty},\n")),
            Target::Java | Target::CSharp => out.push_str(&format!("    private {ty} {field};\n")),
        }
    }
    if target == Target::Rust {
        out.push_str(&format!("}}\n\nimpl {name} {{\n"));
    }
    out
}

fn visibility(target: Target, modifier: Option<&str>) -> &'static str {
    match (target, modifier) {
        (Target::Rust, Some("public")) => "pub ",
        (Target::Rust, Some("protected")) => "pub(crate) ",
        (Target::Rust, _) => "",
        (_, Some("public")) => "public ",
        (_, Some("protected")) => "protected ",
        (_, _) => "private ",
    }
}

fn emit_rule(
    composite: &Composite,
    grammar: &Grammar,
    rule: &Rule,
    flags: &CodegenFlags,
    target: Target,
    out: &mut String,
) {
    let modifier = rule.modifier.as_deref().or(grammar.default_rule_modifier());
    let vis = visibility(target, modifier);
    let method = if rule.is_lexer_rule() {
        format!("m{}", rule.name)
    } else {
        rule.name.clone()
    };

    if target == Target::Rust {
        out.push_str(&format!("    {vis}fn {method}(&mut self) -> Result<(), RecognitionError> {{\n"));
    } else {
        out.push_str(&format!("    {vis}void {method}() {{\n"));
    }

    let call = |out: &mut String, hook: &str, arg: &str| {
        let line = match target {
            Target::Rust => format!("        self.{hook}({arg});\n"),
            Target::Java | Target::CSharp => format!("        {hook}({arg});\n"),
        };
        out.push_str(&line);
    };
    let quoted = format!("\"{}\"", rule.name);
    if flags.trace {
        call(out, "trace_in", &quoted);
    }
    if flags.debug {
        call(out, "enter_rule", &quoted);
    }

    let lexer = grammar.kind() == GrammarKind::Lexer;
    for decision in grammar.decisions().iter().filter(|d| d.rule == rule.name) {
        if flags.profile {
            call(out, "profile_decision", &decision.number.to_string());
        }
        emit_decision(composite, decision, flags, lexer, out);
    }

    if flags.debug {
        call(out, "exit_rule", &quoted);
    }
    if flags.trace {
        call(out, "trace_out", &quoted);
    }
    if target == Target::Rust {
        out.push_str("        Ok(())\n");
    }
    out.push_str("    }\n");
}

fn emit_decision(composite: &Composite, decision: &Decision, flags: &CodegenFlags, lexer: bool, out: &mut String) {
    let style = if decision.dfa_state_count() > flags.tuning.max_inline_dfa_states {
        "table"
    } else {
        "inline"
    };
    out.push_str(&format!(
        "        // decision {} ({}, {style})\n",
        decision.number,
        if decision.is_ll1() { "LL(1)" } else { "non-LL(1)" }
    ));
    for (i, look) in decision.alternatives.iter().enumerate() {
        let labels = look.describe(composite.vocab(), lexer);
        let labels = if labels.is_empty() {
            "nothing".to_string()
        } else {
            labels.join(", ")
        };
        out.push_str(&format!("        //   alt {} on {labels}\n", i + 1));
    }
}
