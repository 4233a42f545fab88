//! Incremental search over a corpus.
//!
//! The producer walks the corpus with the query DFA as an explicit state
//! machine. Every transition is one step of [`Mode`]; the full continuation
//! (mode, context, backtrack stack, bindings, RNG) lives in the [`Searcher`],
//! so [`Searcher::produce`] can return at any step and a later call resumes
//! exactly where the previous one stopped.
//!
//! ```text
//! cleanup ──► boundary ──► look ──► found ────────┐
//!    ▲  ▲                   │  └──► phrase_found ─┤
//!    │  └─ pop ─────────────┤                     ▼
//!    │                      └──► not_found ──► add
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! Matching is greedy: a final state only records a candidate end, and the
//! engine keeps extending. When an extension fails, the longest candidate is
//! reported; alternatives on the backtrack stack are only explored while no
//! candidate exists.

use rand::SeedableRng;
use rand::rngs::StdRng;

use kwic_compiler::{Bindings, Label, Query, SymbolId, Within};
use kwic_core::{Corpus, Span};

use super::context::SearchContext;
use super::error::SearchError;
use super::options::SearchOptions;
use super::trace::{NoopTracer, Tracer};
use crate::area::SearchArea;
use crate::buffer::{Match, MatchBuffer, MatchBufferInfo, Offer};
use crate::cancel::CancellationToken;

/// Step of the search state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Backtrack, or start the next attempt.
    Cleanup,
    /// Move the position into the next searchable region.
    Boundary,
    /// Test the links of the current state.
    Look,
    Found,
    PhraseFound,
    NotFound,
    /// Hand the match to the buffer.
    Add,
    Finish,
}

/// Why [`Searcher::produce`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Produced {
    /// The whole corpus was searched.
    Exhausted,
    /// `max_new_results` matches were emitted by this call.
    LimitReached,
    /// The buffer is full; the pending match is emitted by the next call
    /// once there is room.
    BufferFull,
    Cancelled,
}

/// One search of a compiled query over the corpus it was compiled for.
pub struct Searcher<'a, C: ?Sized> {
    query: &'a Query,
    corpus: &'a C,
    options: SearchOptions,
    area: SearchArea,
    mode: Mode,
    ctx: SearchContext,
    stack: Vec<SearchContext>,
    bindings: Bindings,
    started: bool,
    rng: Option<StdRng>,
}

impl<'a, C: Corpus + ?Sized> Searcher<'a, C> {
    pub fn new(query: &'a Query, corpus: &'a C, options: SearchOptions) -> Self {
        let area = if options.use_index {
            SearchArea::build(query, corpus, options.unindex_threshold)
        } else {
            SearchArea::unrestricted(corpus.len())
        };
        Self {
            query,
            corpus,
            area,
            mode: Mode::Cleanup,
            ctx: SearchContext::new(query.dfa().start()),
            stack: Vec::new(),
            bindings: Bindings::first(query.variable_ranges()),
            started: false,
            rng: options.sample_seed.map(StdRng::seed_from_u64),
            options,
        }
    }

    /// Start over from the beginning of the corpus.
    pub fn reset(&mut self) {
        self.mode = Mode::Cleanup;
        self.ctx = SearchContext::new(self.query.dfa().start());
        self.stack.clear();
        self.bindings = Bindings::first(self.query.variable_ranges());
        self.started = false;
        self.rng = self.options.sample_seed.map(StdRng::seed_from_u64);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn area(&self) -> &SearchArea {
        &self.area
    }

    /// Run until `max_new_results` matches were emitted, the buffer filled
    /// up, the token was cancelled or the corpus was exhausted. A limit of
    /// zero returns [`Produced::LimitReached`] without scanning, unless the
    /// search has already finished.
    ///
    /// `notify` receives the buffer counters after every `notify_every_n`-th
    /// result (never when zero).
    pub fn produce(
        &mut self,
        buffer: &MatchBuffer,
        max_new_results: usize,
        token: &CancellationToken,
        notify_every_n: usize,
        notify: impl FnMut(&MatchBufferInfo),
    ) -> Result<Produced, SearchError> {
        self.produce_with(
            buffer,
            max_new_results,
            token,
            notify_every_n,
            notify,
            &mut NoopTracer,
        )
    }

    /// [`produce`](Self::produce) with a tracer.
    pub fn produce_with<T: Tracer>(
        &mut self,
        buffer: &MatchBuffer,
        max_new_results: usize,
        token: &CancellationToken,
        notify_every_n: usize,
        mut notify: impl FnMut(&MatchBufferInfo),
        tracer: &mut T,
    ) -> Result<Produced, SearchError> {
        if max_new_results == 0 && self.mode != Mode::Finish {
            return Ok(Produced::LimitReached);
        }

        let mut emitted = 0;
        let outcome = loop {
            match self.mode {
                Mode::Cleanup => self.cleanup(tracer),
                Mode::Boundary => {
                    if token.is_cancelled() {
                        break Produced::Cancelled;
                    }
                    self.boundary(tracer);
                }
                Mode::Look => {
                    if token.is_cancelled() {
                        break Produced::Cancelled;
                    }
                    self.look(tracer)?;
                }
                Mode::Found => self.found(),
                Mode::PhraseFound => self.phrase_found()?,
                Mode::NotFound => self.not_found(),
                Mode::Add => {
                    if emitted >= max_new_results {
                        break Produced::LimitReached;
                    }
                    match self.add(buffer, tracer)? {
                        Some(Offer::Full) => break Produced::BufferFull,
                        Some(Offer::Counted(info)) => {
                            emitted += 1;
                            if notify_every_n > 0 && info.num_results % notify_every_n == 0 {
                                notify(&info);
                            }
                            if emitted >= max_new_results {
                                break Produced::LimitReached;
                            }
                        }
                        None => {}
                    }
                }
                Mode::Finish => break Produced::Exhausted,
            }
        };

        tracing::debug!(?outcome, emitted, index = self.ctx.index, "produce");
        Ok(outcome)
    }

    fn cleanup<T: Tracer>(&mut self, tracer: &mut T) {
        if let Some(saved) = self.stack.pop() {
            self.ctx = saved;
            tracer.trace_backtrack(saved.state, saved.index);
            self.mode = Mode::Look;
            return;
        }

        let ctx = &mut self.ctx;
        ctx.state = self.query.dfa().start();
        ctx.link = 0;
        ctx.phrase = None;

        if !self.started {
            self.started = true;
            ctx.index = 0;
        } else if self.query.has_variables() {
            // Every binding is tried at a start position before moving on.
            if let Some(start) = ctx.match_start {
                ctx.index = start;
            }
            if !self.bindings.advance(self.query.variable_ranges()) {
                ctx.index += 1;
            }
        } else {
            ctx.index = ctx.match_start.map_or(ctx.index + 1, |start| start + 1);
        }

        ctx.clear_candidates();
        tracer.trace_restart(ctx.index);
        self.mode = Mode::Boundary;
    }

    fn boundary<T: Tracer>(&mut self, tracer: &mut T) {
        let from = self.ctx.index;
        if !self.restrict() {
            tracer.trace_finish();
            self.mode = Mode::Finish;
            return;
        }
        if self.ctx.index != from {
            tracer.trace_skip(from, self.ctx.index);
        }
        self.mode = Mode::Look;
    }

    /// Move `index` forward to the first position inside the search area, a
    /// document passing the `meta` filter and the `within` scope. `false`
    /// when there is none.
    fn restrict(&mut self) -> bool {
        let corpus = self.corpus;
        let query = self.query;
        let docs = corpus.documents();
        let ctx = &mut self.ctx;

        loop {
            if ctx.index >= corpus.len() {
                return false;
            }
            match self.area.next_candidate(ctx.index) {
                Some(index) if index < corpus.len() => ctx.index = index,
                _ => return false,
            }

            let meta_ok = |d: usize| query.meta().is_none_or(|e| e.eval_document(&docs[d]));
            let in_document = docs
                .get(ctx.document)
                .is_some_and(|d| d.span.contains(ctx.index));
            if !in_document || !meta_ok(ctx.document) {
                let mut d = docs.partition_point(|d| d.span.high <= ctx.index);
                while d < docs.len() && !meta_ok(d) {
                    d += 1;
                }
                let Some(doc) = docs.get(d) else {
                    return false;
                };
                ctx.document = d;
                if ctx.index < doc.span.low {
                    ctx.index = doc.span.low;
                    continue;
                }
            }

            match query.within() {
                None => {}
                Some(Within::Subdocument(kind)) => {
                    let spans = corpus.subdocuments(kind).unwrap_or_default();
                    let s = spans.partition_point(|s| s.high <= ctx.index);
                    let Some(span) = spans.get(s) else {
                        return false;
                    };
                    ctx.subdocument = s;
                    if ctx.index < span.low {
                        ctx.index = span.low;
                        continue;
                    }
                }
                Some(Within::Phrase(expr)) => {
                    // Positions only grow, so the first fitting group does too.
                    let groups = corpus.syntax_groups();
                    let mut g = ctx.group.unwrap_or(0);
                    while g < groups.len()
                        && (groups[g].to < ctx.index || !expr.eval_group(corpus, g))
                    {
                        g += 1;
                    }
                    let Some(group) = groups.get(g) else {
                        return false;
                    };
                    ctx.group = Some(g);
                    if ctx.index < group.from {
                        ctx.index = group.from;
                        continue;
                    }
                }
            }
            return true;
        }
    }

    fn look<T: Tracer>(&mut self, tracer: &mut T) -> Result<(), SearchError> {
        let query = self.query;
        let state_id = self.ctx.state;
        let state = query.dfa().state(state_id);

        if state.is_final {
            self.ctx.promote();
        }

        let too_long = self
            .ctx
            .match_start
            .is_some_and(|start| self.ctx.index - start >= self.options.max_match_length);
        if too_long {
            self.mode = Mode::NotFound;
            return Ok(());
        }

        while let Some(link) = state.links.get(self.ctx.link) {
            let index = self.ctx.index;

            if let Label::Symbol(id) = link.label
                && query.is_phrase_symbol(id)
            {
                if let Some(group) = self.find_group(id) {
                    self.ctx.phrase = Some(group);
                    tracer.trace_phrase(state_id, link, group);
                    self.mode = Mode::PhraseFound;
                    return Ok(());
                }
                tracer.trace_link(state_id, link, index, false);
                self.ctx.phrase = None;
                self.ctx.link += 1;
                continue;
            }

            let matched = self.test(link.label, index);
            tracer.trace_link(state_id, link, index, matched);
            if matched {
                if self.ctx.link + 1 < state.links.len() {
                    let mut saved = self.ctx;
                    saved.link += 1;
                    self.push(saved)?;
                }
                if link.flags.is_focus() {
                    self.ctx.focus_candidate = Some(index);
                }
                self.mode = Mode::Found;
                return Ok(());
            }
            self.ctx.link += 1;
        }

        self.mode = Mode::NotFound;
        Ok(())
    }

    fn test(&self, label: Label, index: usize) -> bool {
        match label {
            Label::Wildcard => index < self.corpus.len(),
            Label::Symbol(id) => self
                .corpus
                .segment(index)
                .is_some_and(|segment| self.query.symbol(id).eval(&segment, &self.bindings)),
            Label::Epsilon => false,
        }
    }

    /// Next syntax group starting at the current position that satisfies
    /// phrase symbol `id` and fits in the scope.
    fn find_group(&self, id: SymbolId) -> Option<usize> {
        let groups = self.corpus.syntax_groups();
        let index = self.ctx.index;
        let scope = self.scope();
        let expr = self.query.symbol(id);

        let mut g = self
            .ctx
            .phrase
            .unwrap_or_else(|| groups.partition_point(|group| group.from < index));
        while let Some(group) = groups.get(g).filter(|group| group.from == index) {
            if group.to < scope.high && expr.eval_group(self.corpus, g) {
                return Some(g);
            }
            g += 1;
        }
        None
    }

    fn found(&mut self) {
        let target = self.query.dfa().state(self.ctx.state).links[self.ctx.link].target;
        self.ctx.follow(target);
        self.ctx.index += 1;
        self.advanced();
    }

    fn phrase_found(&mut self) -> Result<(), SearchError> {
        let link = self.query.dfa().state(self.ctx.state).links[self.ctx.link];
        let Some(g) = self.ctx.phrase else {
            self.mode = Mode::NotFound;
            return Ok(());
        };

        // Another group may start here too.
        let mut saved = self.ctx;
        saved.phrase = Some(g + 1);
        self.push(saved)?;

        if link.flags.is_focus() {
            self.ctx.focus_candidate = Some(self.ctx.index);
        }
        self.ctx.follow(link.target);
        self.ctx.index = self.corpus.syntax_groups()[g].to + 1;
        self.advanced();
        Ok(())
    }

    /// After consuming input: at the end of the scope the attempt is over.
    fn advanced(&mut self) {
        if self.ctx.index < self.scope().high {
            self.mode = Mode::Look;
            return;
        }
        if self.query.dfa().state(self.ctx.state).is_final {
            self.ctx.promote();
        }
        self.mode = if self.ctx.match_end.is_some() {
            Mode::Add
        } else {
            Mode::Cleanup
        };
    }

    fn not_found(&mut self) {
        let ctx = &mut self.ctx;
        self.mode = if let Some(start) = ctx.match_start {
            match ctx.match_end {
                Some(end) if end != start => Mode::Add,
                _ => Mode::Cleanup,
            }
        } else if self.query.has_variables() {
            Mode::Cleanup
        } else {
            ctx.clear_candidates();
            ctx.index += 1;
            Mode::Boundary
        };
    }

    fn add<T: Tracer>(
        &mut self,
        buffer: &MatchBuffer,
        tracer: &mut T,
    ) -> Result<Option<Offer>, SearchError> {
        let (Some(start), Some(end)) = (self.ctx.match_start, self.ctx.match_end) else {
            self.mode = Mode::Cleanup;
            return Ok(None);
        };
        let m = Match {
            start,
            end,
            focus: self.ctx.match_focus.unwrap_or(start),
            document: self.ctx.document,
            within: self.scope(),
        };

        let offer = buffer.offer(m, self.rng.as_mut())?;
        if let Offer::Counted(_) = offer {
            tracer.trace_match(&m);
            self.stack.clear();
            if !self.options.nested_results {
                self.ctx.match_start = Some(end - 1);
            }
            self.mode = Mode::Cleanup;
        }
        Ok(Some(offer))
    }

    fn push(&mut self, saved: SearchContext) -> Result<(), SearchError> {
        self.stack
            .try_reserve(1)
            .map_err(SearchError::oom("the backtrack stack"))?;
        self.stack.push(saved);
        Ok(())
    }

    /// Region the current attempt must stay in.
    fn scope(&self) -> Span {
        let corpus = self.corpus;
        let mut scope = corpus
            .documents()
            .get(self.ctx.document)
            .map_or(Span::new(0, corpus.len()), |d| d.span);

        let inner = match self.query.within() {
            None => None,
            Some(Within::Subdocument(kind)) => corpus
                .subdocuments(kind)
                .and_then(|spans| spans.get(self.ctx.subdocument))
                .copied(),
            Some(Within::Phrase(_)) => self
                .ctx
                .group
                .and_then(|g| corpus.syntax_groups().get(g))
                .map(|group| group.span()),
        };
        if let Some(inner) = inner {
            scope.low = scope.low.max(inner.low);
            scope.high = scope.high.min(inner.high).max(scope.low);
        }
        scope
    }
}
