//! Builder-pattern printer for rendering compile errors against the query.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use crate::error::CompileError;

pub struct DiagnosticPrinter<'e, 's> {
    error: &'e CompileError,
    source: &'s str,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> DiagnosticPrinter<'e, 's> {
    pub fn new(error: &'e CompileError, source: &'s str) -> Self {
        Self {
            error,
            source,
            path: None,
            colored: false,
        }
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
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
        let message = self.error.to_string();
        if self.source.is_empty() {
            return write!(w, "error: {message}");
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let range = adjust_range(self.error.span(), self.source.len());
        let mut snippet = Snippet::source(self.source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range));
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report = [Level::ERROR.primary_title(&message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Widen empty spans to one character so the caret is visible.
fn adjust_range(range: Range<usize>, limit: usize) -> Range<usize> {
    let start = range.start.min(limit);
    let end = range.end.clamp(start, limit);
    if start == end {
        return start.min(limit.saturating_sub(1))..(start + 1).min(limit);
    }
    start..end
}

impl CompileError {
    pub fn printer<'s>(&self, source: &'s str) -> DiagnosticPrinter<'_, 's> {
        DiagnosticPrinter::new(self, source)
    }
}
