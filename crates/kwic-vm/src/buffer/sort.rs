//! Concordance sorting.
//!
//! Each match is reduced once to a key: the collation ranks of the
//! orthographic forms in the sorted column. Keys are then ordered with a
//! stable bottom-up merge sort over a permutation, so sorting by several
//! columns is done by sorting repeatedly from the least significant column,
//! and cancellation is checked between merge passes.

use std::cmp::Ordering;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use kwic_core::Corpus;

use super::{Match, MatchBuffer};
use crate::cancel::CancellationToken;
use crate::engine::SearchError;

/// Part of a concordance line a sort looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortColumn {
    /// `context` positions before the match.
    LeftContext,
    /// From the match start to the focus.
    LeftMatch,
    /// The whole match.
    Match,
    /// From the focus to the match end.
    RightMatch,
    /// `context` positions after the match.
    RightContext,
}

impl SortColumn {
    fn range(self, m: &Match, context: usize, len: usize) -> Range<usize> {
        let range = match self {
            SortColumn::LeftContext => m.start.saturating_sub(context)..m.start,
            SortColumn::LeftMatch => m.start..m.focus,
            SortColumn::Match => m.start..m.end,
            SortColumn::RightMatch => m.focus..m.end,
            SortColumn::RightContext => m.end..m.end.saturating_add(context),
        };
        let end = range.end.min(len);
        range.start.min(end)..end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortCriteria {
    pub column: SortColumn,
    pub ascending: bool,
    /// Compare word forms and sequences from their ends.
    pub atergo: bool,
    /// Width of the context columns.
    pub context: usize,
}

impl Default for SortCriteria {
    fn default() -> Self {
        Self {
            column: SortColumn::Match,
            ascending: true,
            atergo: false,
            context: 5,
        }
    }
}

impl SortCriteria {
    pub fn new(column: SortColumn) -> Self {
        Self {
            column,
            ..Self::default()
        }
    }

    pub fn ascending(mut self, value: bool) -> Self {
        self.ascending = value;
        self
    }

    pub fn atergo(mut self, value: bool) -> Self {
        self.atergo = value;
        self
    }

    pub fn context(mut self, width: usize) -> Self {
        self.context = width;
        self
    }

    fn key<C: Corpus + ?Sized>(&self, corpus: &C, m: &Match) -> Vec<u32> {
        let collation = corpus.collation();
        self.column
            .range(m, self.context, corpus.len())
            .filter_map(|position| corpus.segment(position))
            .map(|segment| collation.rank(segment.orth(), self.atergo))
            .collect()
    }

    fn compare(&self, a: &[u32], b: &[u32]) -> Ordering {
        // Slices order shorter-first on a common prefix, and so do the
        // reversed iterators on a common suffix.
        let ord = if self.atergo {
            a.iter().rev().cmp(b.iter().rev())
        } else {
            a.cmp(b)
        };
        if self.ascending { ord } else { ord.reverse() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOutcome {
    Sorted,
    /// The buffer was left as it was.
    Cancelled,
}

impl MatchBuffer {
    /// Stable sort of the stored matches by `criteria`.
    ///
    /// Holds the buffer lock throughout; readers see either the old or the
    /// fully sorted order.
    pub fn sort<C: Corpus + ?Sized>(
        &self,
        corpus: &C,
        criteria: &SortCriteria,
        token: &CancellationToken,
    ) -> Result<SortOutcome, SearchError> {
        let mut slots = self.slots.lock();
        let n = slots.entries.len();

        let mut keys = Vec::new();
        keys.try_reserve_exact(n)
            .map_err(SearchError::oom("sort keys"))?;
        keys.extend(slots.entries.iter().map(|m| criteria.key(corpus, m)));

        let mut order = Vec::new();
        order
            .try_reserve_exact(n)
            .map_err(SearchError::oom("the sort permutation"))?;
        order.extend(0..n);

        let compare = |a: usize, b: usize| criteria.compare(&keys[a], &keys[b]);
        if !merge_sort(&mut order, compare, token)? {
            tracing::debug!(matches = n, "sort cancelled");
            return Ok(SortOutcome::Cancelled);
        }

        let mut sorted = Vec::new();
        sorted
            .try_reserve_exact(n)
            .map_err(SearchError::oom("the sorted buffer"))?;
        sorted.extend(order.iter().map(|&i| slots.entries[i]));
        slots.entries = sorted;
        Ok(SortOutcome::Sorted)
    }
}

/// Bottom-up merge sort of `order`. Returns `false` when cancelled, leaving
/// `order` in an unspecified permutation.
fn merge_sort(
    order: &mut Vec<usize>,
    compare: impl Fn(usize, usize) -> Ordering,
    token: &CancellationToken,
) -> Result<bool, SearchError> {
    let n = order.len();
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(n)
        .map_err(SearchError::oom("sort scratch"))?;
    scratch.resize(n, 0);

    let mut width = 1;
    while width < n {
        if token.is_cancelled() {
            return Ok(false);
        }
        for lo in (0..n).step_by(2 * width) {
            let mid = (lo + width).min(n);
            let hi = (lo + 2 * width).min(n);
            merge(&order[lo..mid], &order[mid..hi], &mut scratch[lo..hi], &compare);
        }
        std::mem::swap(order, &mut scratch);
        width *= 2;
    }
    Ok(true)
}

/// Equal elements are taken from `left` first.
fn merge(
    left: &[usize],
    right: &[usize],
    out: &mut [usize],
    compare: &impl Fn(usize, usize) -> Ordering,
) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_left = j == right.len()
            || (i < left.len() && compare(left[i], right[j]) != Ordering::Greater);
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}
