//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics, with source snippets where a span and its source are known.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.snippet_source(diag) {
                Some((path, source, range)) => {
                    self.format_snippet(w, &renderer, diag, path, source, range)?
                }
                None => write!(w, "{}", diag)?,
            }
        }

        Ok(())
    }

    fn snippet_source(&self, diag: &'d DiagnosticMessage) -> Option<(&'d str, &'d str, TextRange)> {
        let path = diag.file.as_deref()?;
        let range = diag.range?;
        let source = self.diagnostics.source(path)?;
        Some((path, source, range))
    }

    fn format_snippet(
        &self,
        w: &mut impl Write,
        renderer: &Renderer,
        diag: &DiagnosticMessage,
        path: &str,
        source: &str,
        range: TextRange,
    ) -> std::fmt::Result {
        let mut snippet = Snippet::source(source)
            .line_start(1)
            .path(path)
            .annotation(AnnotationKind::Primary.span(adjust_range(range, source.len())));

        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(adjust_range(related.range, source.len()))
                    .label(&related.message),
            );
        }

        let level = severity_to_level(diag.severity());
        let report: Vec<Group> = vec![level.primary_title(&diag.message).element(snippet)];

        write!(w, "{}", renderer.render(&report))
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
