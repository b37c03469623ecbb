//! Token type assignment and implicit lexer extraction.
//!
//! Types are handed out across the whole composite from one vocabulary, in
//! this order: an imported `tokenVocab`, `tokens { }` sections, lexer rules,
//! then names and literals referenced from parser rules. A combined root gets
//! the source of its lexer half once every literal has a type.

use std::fs;
use std::path::{Path, PathBuf};

use gramc_core::naming::{implicit_lexer_name, vocab_file_name};
use gramc_core::{GrammarKind, TokenVocabulary};

use super::ast::{Atom, Block, GrammarAst};
use super::{Composite, GrammarId, Stage};
use crate::pipeline::{FrontendError, Problem};

/// Directories searched for `.tokens` files, in order.
#[derive(Debug, Clone, Copy)]
pub struct VocabDirs<'a> {
    pub lib_dir: &'a Path,
    pub output_dir: Option<&'a Path>,
}

impl VocabDirs<'_> {
    /// The library directory wins; otherwise the file is expected where this
    /// run writes vocabularies, whether or not it exists yet.
    pub fn locate(&self, vocab_name: &str) -> PathBuf {
        let file = vocab_file_name(vocab_name);
        let in_lib = self.lib_dir.join(&file);
        if in_lib.is_file() {
            return in_lib;
        }
        self.output_dir.unwrap_or(Path::new(".")).join(file)
    }
}

pub fn assign_token_types(composite: &mut Composite, dirs: &VocabDirs<'_>) -> Result<(), FrontendError> {
    composite.require_all(Stage::Parsed, "token type assignment")?;

    if let Some(vocab_name) = composite.root().ast().option("tokenVocab") {
        let imported = load_vocab(composite, vocab_name, dirs)?;
        composite.vocab_mut().import(&imported);
    }

    let order = composite.breadth_first();
    let mut vocab = std::mem::take(composite.vocab_mut());
    let mut implicit_literals: Vec<String> = Vec::new();

    for &id in &order {
        for spec in &composite.get(id).ast().tokens {
            match &spec.literal {
                Some(lit) => {
                    vocab.alias_literal(lit, &spec.name);
                    push_unique(&mut implicit_literals, lit);
                }
                None => {
                    vocab.define_token(&spec.name);
                }
            }
        }
    }

    for &id in &order {
        let grammar = composite.get(id);
        if !grammar.kind().allows_lexer_rules() {
            continue;
        }
        for rule in grammar.ast().lexer_rules().filter(|r| !r.fragment) {
            match rule.single_literal() {
                Some(lit) => vocab.alias_literal(lit, &rule.name),
                None => vocab.define_token(&rule.name),
            };
        }
    }

    for &id in &order {
        let grammar = composite.get(id);
        if !grammar.kind().allows_parser_rules() {
            continue;
        }
        for rule in grammar.ast().parser_rules() {
            define_references(&rule.block, &mut vocab, &mut implicit_literals);
        }
    }

    *composite.vocab_mut() = vocab;

    let root = composite.root();
    if root.kind() == GrammarKind::Combined {
        let text = lexer_grammar_text(composite, &implicit_literals);
        composite.get_mut(GrammarId::ROOT).set_lexer_text(text);
    }

    composite.mark_all(Stage::TokensAssigned);
    Ok(())
}

fn load_vocab(
    composite: &Composite,
    vocab_name: &str,
    dirs: &VocabDirs<'_>,
) -> Result<TokenVocabulary, FrontendError> {
    let path = dirs.locate(vocab_name);
    let root = composite.root();
    let text = fs::read_to_string(&path).map_err(|_| FrontendError::Grammar {
        problems: vec![Problem {
            file: root.file().to_string(),
            range: root.ast().name_span,
            message: format!("cannot find tokens file {}", path.display()),
        }],
    })?;
    TokenVocabulary::parse(&text).map_err(|source| FrontendError::Vocab { path, source })
}

fn define_references(block: &Block, vocab: &mut TokenVocabulary, literals: &mut Vec<String>) {
    for element in block.alternatives.iter().flat_map(|a| &a.elements) {
        define_atom(&element.atom, vocab, literals);
    }
}

fn define_atom(atom: &Atom, vocab: &mut TokenVocabulary, literals: &mut Vec<String>) {
    match atom {
        Atom::TokenRef(name) => {
            vocab.define_token(name);
        }
        Atom::Literal(lit) => {
            if vocab.literal_type(lit).is_none() {
                vocab.define_literal(lit);
            }
            push_unique(literals, lit);
        }
        Atom::Not(inner) => define_atom(inner, vocab, literals),
        Atom::Block(block) => define_references(block, vocab, literals),
        Atom::RuleRef(_) | Atom::Range(..) | Atom::Wildcard | Atom::Action(_) => {}
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|l| l == item) {
        list.push(item.to_string());
    }
}

/// Source of the lexer grammar hidden in a combined root, `None` when it
/// would contain no rules.
fn lexer_grammar_text(composite: &Composite, literals: &[String]) -> Option<String> {
    let root = composite.root();
    let ast = root.ast();
    let vocab = composite.vocab();

    let mut rules = String::new();
    for lit in literals {
        let Some(ttype) = vocab.literal_type(lit) else {
            continue;
        };
        let Some(name) = vocab.name_of(ttype) else {
            continue;
        };
        if ast.rule(name).is_some_and(|r| r.is_lexer_rule()) {
            continue;
        }
        rules.push_str(&format!("{name} : {lit} ;\n"));
    }
    for rule in ast.lexer_rules() {
        rules.push_str(&root.source()[std::ops::Range::<usize>::from(rule.span)]);
        rules.push('\n');
    }
    if rules.is_empty() {
        return None;
    }

    let mut out = format!("lexer grammar {};\n", implicit_lexer_name(&ast.name));
    write_lexer_prequel(composite, ast, &mut out);
    out.push('\n');
    out.push_str(&rules);
    Some(out)
}

fn write_lexer_prequel(composite: &Composite, ast: &GrammarAst, out: &mut String) {
    if let Some(language) = ast.options.get("language") {
        out.push_str(&format!("options {{\n  language={language};\n}}\n"));
    }

    let lexer_delegates: Vec<&str> = composite
        .direct_delegates(GrammarId::ROOT)
        .iter()
        .map(|&d| composite.get(d))
        .filter(|g| g.kind() == GrammarKind::Lexer)
        .map(|g| g.name())
        .collect();
    if !lexer_delegates.is_empty() {
        out.push_str(&format!("import {};\n", lexer_delegates.join(", ")));
    }

    for action in ast.actions.iter().filter(|a| a.scope.as_deref() == Some("lexer")) {
        out.push_str(&format!("@{} {}\n", action.name, action.text));
    }
}
