//! Tracing infrastructure for debugging searches.
//!
//! The tracer is a zero-cost abstraction: [`NoopTracer`] methods are
//! `#[inline(always)]` and empty, so a search run through
//! [`Searcher::produce`](super::Searcher::produce) carries no tracing state
//! or calls. [`PrintTracer`] records one line per event for `kwic trace`.
//!
//! Tracing-only state (such as the corpus text shown next to a position)
//! stays in the tracer; the search context never grows fields for it.

use kwic_compiler::{DfaLink, Label, Query, StateId};
use kwic_core::{Corpus, Span};

use crate::buffer::Match;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Successful link tests, backtracks and matches.
    #[default]
    Default,
    /// Also failed link tests, restarts and boundary skips.
    Verbose,
}

/// Search instrumentation.
///
/// Methods receive raw data the engine already has; name resolution and
/// formatting happen in the implementation.
pub trait Tracer {
    /// A new match attempt starts at `index`.
    fn trace_restart(&mut self, index: usize);

    /// `boundary` moved the position forward.
    fn trace_skip(&mut self, from: usize, to: usize);

    /// A token link was tested at `index`.
    fn trace_link(&mut self, state: StateId, link: &DfaLink, index: usize, matched: bool);

    /// A phrase link matched syntax group `group`.
    fn trace_phrase(&mut self, state: StateId, link: &DfaLink, group: usize);

    /// A saved context was restored.
    fn trace_backtrack(&mut self, state: StateId, index: usize);

    /// A match was handed to the buffer.
    fn trace_match(&mut self, m: &Match);

    /// The corpus is exhausted.
    fn trace_finish(&mut self);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_restart(&mut self, _index: usize) {}

    #[inline(always)]
    fn trace_skip(&mut self, _from: usize, _to: usize) {}

    #[inline(always)]
    fn trace_link(&mut self, _state: StateId, _link: &DfaLink, _index: usize, _matched: bool) {}

    #[inline(always)]
    fn trace_phrase(&mut self, _state: StateId, _link: &DfaLink, _group: usize) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _state: StateId, _index: usize) {}

    #[inline(always)]
    fn trace_match(&mut self, _m: &Match) {}

    #[inline(always)]
    fn trace_finish(&mut self) {}
}

/// Tracer that collects a readable search trace.
///
/// ```text
///     1  S0 → S1    pos=adj          quick
///     2  S1 → S2    pos=adj^         brown
///     3  S2 → S3    pos=noun^        fox
///     ●  1..4 ^3  quick brown fox
/// ```
pub struct PrintTracer<'a, C: ?Sized> {
    query: &'a Query,
    corpus: &'a C,
    verbosity: Verbosity,
    lines: Vec<String>,
}

impl<'a, C: Corpus + ?Sized> PrintTracer<'a, C> {
    pub fn new(query: &'a Query, corpus: &'a C, verbosity: Verbosity) -> Self {
        Self {
            query,
            corpus,
            verbosity,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    fn label(&self, link: &DfaLink) -> String {
        let mut out = match link.label {
            Label::Symbol(id) => self.query.symbol(id).to_string(),
            Label::Wildcard => "[]".to_owned(),
            Label::Epsilon => "ε".to_owned(),
        };
        if link.flags.is_focus() {
            out.push('^');
        }
        out
    }

    fn orth(&self, index: usize) -> &str {
        self.corpus
            .segment(index)
            .map_or("", |s| self.corpus.interner().resolve(s.orth()))
    }

    fn text(&self, span: Span) -> String {
        (span.low..span.high)
            .map(|i| self.orth(i))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<C: Corpus + ?Sized> Tracer for PrintTracer<'_, C> {
    fn trace_restart(&mut self, index: usize) {
        if self.verbose() {
            self.lines.push(format!("  ▶  @{index}"));
        }
    }

    fn trace_skip(&mut self, from: usize, to: usize) {
        if self.verbose() {
            self.lines.push(format!("  ⇥  @{from} → @{to}"));
        }
    }

    fn trace_link(&mut self, state: StateId, link: &DfaLink, index: usize, matched: bool) {
        if !matched && !self.verbose() {
            return;
        }
        let step = if matched {
            format!("S{state} → S{}", link.target)
        } else {
            format!("S{state} ✗")
        };
        let line = format!(
            "{index:>5}  {step:<10} {:<16} {}",
            self.label(link),
            self.orth(index)
        );
        self.lines.push(line.trim_end().to_owned());
    }

    fn trace_phrase(&mut self, state: StateId, link: &DfaLink, group: usize) {
        let g = self.corpus.syntax_groups()[group];
        let step = format!("S{state} → S{}", link.target);
        let line = format!(
            "{:>5}  {step:<10} {:<16} <{}>",
            g.from,
            self.label(link),
            self.text(g.span())
        );
        self.lines.push(line);
    }

    fn trace_backtrack(&mut self, state: StateId, index: usize) {
        self.lines.push(format!("    ↩  S{state} @{index}"));
    }

    fn trace_match(&mut self, m: &Match) {
        let text = self.text(m.span());
        self.lines
            .push(format!("    ●  {}..{} ^{}  {text}", m.start, m.end, m.focus));
    }

    fn trace_finish(&mut self) {
        self.lines.push("    ■  exhausted".to_owned());
    }
}
