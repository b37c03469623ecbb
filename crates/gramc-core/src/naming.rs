//! Names of files and recognizers derived from grammar names.
//!
//! These derivations are fixed: none of them is user-configurable, so the
//! build checker can predict the output of a compile without running it.

use crate::{GRAMMAR_FILE_EXTENSION, GrammarKind, IMPLICIT_FILE_MARKER, VOCAB_FILE_EXTENSION};

/// File the implicit lexer of combined grammar `parent` is written to.
///
/// # Examples
/// ```
/// use gramc_core::naming::implicit_lexer_file_name;
/// assert_eq!(implicit_lexer_file_name("Expr"), "Expr__.g");
/// ```
pub fn implicit_lexer_file_name(parent: &str) -> String {
    format!("{parent}{IMPLICIT_FILE_MARKER}{GRAMMAR_FILE_EXTENSION}")
}

/// Grammar name declared inside the implicit lexer source.
pub fn implicit_lexer_name(parent: &str) -> String {
    format!("{parent}{}", GrammarKind::Lexer.recognizer_suffix())
}

/// Vocabulary file produced by compiling grammar `name`.
pub fn vocab_file_name(name: &str) -> String {
    format!("{name}{VOCAB_FILE_EXTENSION}")
}

pub fn is_vocab_file(file_name: &str) -> bool {
    file_name.ends_with(VOCAB_FILE_EXTENSION)
}

/// Name of the recognizer generated for a grammar.
///
/// Only combined grammars get a suffix; their lexer half is emitted as a
/// separate grammar whose name already carries `Lexer`.
pub fn recognizer_name(name: &str, kind: GrammarKind) -> String {
    match kind {
        GrammarKind::Combined => format!("{name}{}", kind.recognizer_suffix()),
        _ => name.to_string(),
    }
}

/// Token name synthesized for an unnamed literal in a combined grammar.
pub fn literal_token_name(token_type: u32) -> String {
    format!("T{IMPLICIT_FILE_MARKER}{token_type}")
}

/// Directory component of a grammar file name as given on the command line.
///
/// Returns `"."` when the name has no directory component. Both `/` and `\`
/// count as separators so names written on Windows behave the same.
pub fn grammar_output_directory(file_name: &str) -> &str {
    match file_name.rfind(['/', '\\']) {
        Some(0) => "/",
        Some(idx) => &file_name[..idx],
        None => ".",
    }
}
