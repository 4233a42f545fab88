//! Search area restriction.
//!
//! The corpus is divided into granules of `granularity` positions. Before a
//! search starts, the positional index is consulted for the values each DFA
//! link tests, giving the set of granules in which a match can start. The
//! engine then skips every granule outside that set.
//!
//! Two passes narrow the area:
//!
//! - depth first: every path from the start state to a final state
//!   contributes the intersection of its link sets;
//! - breadth first: for every depth shorter than the shortest match, some
//!   link at that depth must hold, so the union of the link sets per depth
//!   bounds the area.
//!
//! A set of `None` means "unconstrained" throughout.

use std::collections::VecDeque;

use roaring::RoaringBitmap;

use kwic_compiler::expr::Domain;
use kwic_compiler::{Expr, Label, Query, StateId};
use kwic_core::{Corpus, Symbol};

/// Upper bound on states visited by the depth-first pass; past it the pass
/// gives up and leaves the area unrestricted.
const DEPTH_FIRST_BUDGET: usize = 1 << 14;

/// Granules in which a match may start.
#[derive(Clone, Debug)]
pub struct SearchArea {
    granules: RoaringBitmap,
    granularity: usize,
}

impl SearchArea {
    /// A single granule covering the whole corpus.
    pub fn unrestricted(len: usize) -> Self {
        let mut granules = RoaringBitmap::new();
        granules.insert(0);
        Self {
            granules,
            granularity: len.max(1),
        }
    }

    /// Area of `query` over `corpus`. Unindexed corpora get the whole corpus.
    ///
    /// Values accepting more than `threshold` symbols are not looked up.
    pub fn build<C: Corpus + ?Sized>(query: &Query, corpus: &C, threshold: usize) -> Self {
        let Some(granularity) = corpus.granularity().filter(|&g| g > 0) else {
            return Self::unrestricted(corpus.len());
        };

        let count = u32::try_from(corpus.len().div_ceil(granularity)).unwrap_or(u32::MAX);
        let mut full = RoaringBitmap::new();
        full.insert_range(0..count);

        let restrictor = Restrictor {
            query,
            corpus,
            granularity,
            threshold,
        };

        let mut granules = restrictor.depth_first(&full).unwrap_or(full);
        for level in restrictor.breadth_first() {
            granules &= level;
        }

        tracing::debug!(
            granularity,
            granules = count,
            candidates = granules.len(),
            "search area"
        );
        Self {
            granules,
            granularity,
        }
    }

    pub fn granularity(&self) -> usize {
        self.granularity
    }

    /// Number of candidate granules.
    pub fn len(&self) -> u64 {
        self.granules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granules.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        u32::try_from(index / self.granularity).is_ok_and(|g| self.granules.contains(g))
    }

    /// First candidate position at or after `index`.
    pub fn next_candidate(&self, index: usize) -> Option<usize> {
        let granule = u32::try_from(index / self.granularity).ok()?;
        if self.granules.contains(granule) {
            return Some(index);
        }
        // `granule` is absent, so the rank counts the set granules below it.
        let below = u32::try_from(self.granules.rank(granule)).ok()?;
        let next = self.granules.select(below)?;
        Some(next as usize * self.granularity)
    }
}

struct Restrictor<'a, C: ?Sized> {
    query: &'a Query,
    corpus: &'a C,
    granularity: usize,
    threshold: usize,
}

struct QueueItem {
    label: Label,
    target: StateId,
    depth: usize,
}

impl<C: Corpus + ?Sized> Restrictor<'_, C> {
    fn depth_first(&self, full: &RoaringBitmap) -> Option<RoaringBitmap> {
        let dfa = self.query.dfa();
        let mut area = RoaringBitmap::new();
        let mut stack = vec![(dfa.start(), full.clone())];
        let mut visited = 0;

        while let Some((id, work)) = stack.pop() {
            visited += 1;
            if visited > DEPTH_FIRST_BUDGET {
                tracing::debug!("search area: depth-first pass over budget");
                return None;
            }

            let state = dfa.state(id);
            let Some(distance) = state.distance.filter(|_| !state.is_final) else {
                area |= work;
                continue;
            };

            for link in &state.links {
                if self.is_phrase(link.label) {
                    // Offsets past a phrase are unknown.
                    area |= &work;
                    continue;
                }
                let mut next = work.clone();
                if let Some(set) = self.unindex_label(link.label, distance) {
                    next &= set;
                }
                stack.push((link.target, next));
            }
        }
        Some(area)
    }

    /// Per-depth unions of link sets; unconstrained depths are left out.
    fn breadth_first(&self) -> Vec<RoaringBitmap> {
        let dfa = self.query.dfa();
        let max_len = 3 * dfa.len();
        let mut max_depth = dfa.len();
        let mut overflown = false;
        let mut queue: VecDeque<QueueItem> = VecDeque::new();

        let mut push = |queue: &mut VecDeque<QueueItem>,
                        max_depth: &mut usize,
                        label: Label,
                        target: StateId,
                        depth: usize| {
            if overflown {
                return;
            }
            if dfa.state(target).is_final && depth < *max_depth {
                *max_depth = depth;
            }
            if depth > *max_depth {
                overflown = true;
                return;
            }
            if queue.len() >= max_len {
                overflown = true;
                // The deepest level is now incomplete.
                while queue.back().is_some_and(|item| item.depth >= depth) {
                    queue.pop_back();
                }
                return;
            }
            queue.push_back(QueueItem {
                label,
                target,
                depth,
            });
        };

        for link in &dfa.state(dfa.start()).links {
            push(&mut queue, &mut max_depth, link.label, link.target, 0);
        }

        let mut levels = Vec::new();
        let mut current = 0;
        let mut work: Option<RoaringBitmap> = Some(RoaringBitmap::new());

        while let Some(item) = queue.pop_front() {
            if self.is_phrase(item.label) {
                // Positions past a phrase are unknown: finish this level only.
                max_depth = max_depth.min(item.depth);
                while queue.back().is_some_and(|queued| queued.depth > item.depth) {
                    queue.pop_back();
                }
            }

            let set = self.unindex_label(item.label, item.depth);
            if item.depth > current {
                levels.extend(work.take());
                work = set;
                current += 1;
            } else {
                work = match (work, set) {
                    (Some(mut acc), Some(set)) => {
                        acc |= set;
                        Some(acc)
                    }
                    _ => None,
                };
            }

            for link in &dfa.state(item.target).links {
                push(&mut queue, &mut max_depth, link.label, link.target, current + 1);
            }
        }
        levels.extend(work);
        levels
    }

    fn is_phrase(&self, label: Label) -> bool {
        matches!(label, Label::Symbol(id) if self.query.is_phrase_symbol(id))
    }

    fn unindex_label(&self, label: Label, distance: usize) -> Option<RoaringBitmap> {
        match label {
            Label::Symbol(id) => self.unindex(self.query.symbol(id), distance),
            Label::Wildcard | Label::Epsilon => None,
        }
    }

    fn unindex(&self, expr: &Expr, distance: usize) -> Option<RoaringBitmap> {
        match expr {
            Expr::And {
                negate: false,
                left,
                right,
            } => match (self.unindex(left, distance), self.unindex(right, distance)) {
                (Some(mut l), Some(r)) => {
                    l &= r;
                    Some(l)
                }
                (l, r) => l.or(r),
            },
            Expr::Or {
                negate: false,
                left,
                right,
            } => {
                let mut l = self.unindex(left, distance)?;
                l |= self.unindex(right, distance)?;
                Some(l)
            }
            Expr::Value {
                negate: false,
                value,
            } => {
                let Domain::Token(attr) = value.domain else {
                    return None;
                };
                if value.matches.count() > self.threshold {
                    return None;
                }
                let mut set = RoaringBitmap::new();
                for index in value.matches.iter() {
                    let sym = Symbol::from_raw(u32::try_from(index).ok()?);
                    for &position in self.corpus.occurrences(attr, sym)? {
                        let Some(start) = (position as usize).checked_sub(distance) else {
                            continue;
                        };
                        set.insert(u32::try_from(start / self.granularity).ok()?);
                    }
                }
                Some(set)
            }
            _ => None,
        }
    }
}
