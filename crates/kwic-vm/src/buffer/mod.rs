//! Match storage shared between a search and its readers.
//!
//! A [`MatchBuffer`] has a fixed capacity. In the default mode the search
//! stops when it is full; under reservoir sampling every match is counted and
//! the buffer holds a uniform sample of all of them. All access goes through
//! one lock so that a reader can poll [`MatchBuffer::info`] while the search
//! thread appends.

mod sort;

#[cfg(test)]
mod sort_tests;
#[cfg(test)]
mod tests;

use parking_lot::Mutex;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use kwic_core::{Corpus, Span};

use crate::engine::SearchError;

pub use sort::{SortColumn, SortCriteria, SortOutcome};

/// One search result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// First position of the match.
    pub start: usize,
    /// One past the last position.
    pub end: usize,
    /// The designated center position; `start` when the query has none.
    pub focus: usize,
    /// Index of the containing document.
    pub document: usize,
    /// The scope the match was found in: its document, sub-document or
    /// syntax group.
    pub within: Span,
}

impl Match {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Snapshot of the buffer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBufferInfo {
    pub capacity: usize,
    pub used: usize,
    /// Matches seen so far, including the ones sampling discarded.
    pub num_results: usize,
}

#[derive(Debug, Default)]
struct Slots {
    entries: Vec<Match>,
    capacity: usize,
    num_results: usize,
}

impl Slots {
    fn info(&self) -> MatchBufferInfo {
        MatchBufferInfo {
            capacity: self.capacity,
            used: self.entries.len(),
            num_results: self.num_results,
        }
    }
}

/// What became of a match handed to [`MatchBuffer::offer`].
#[derive(Debug)]
pub(crate) enum Offer {
    /// Counted; stored unless sampling discarded it.
    Counted(MatchBufferInfo),
    /// No room and not sampling; nothing changed.
    Full,
}

#[derive(Debug, Default)]
pub struct MatchBuffer {
    slots: Mutex<Slots>,
}

impl MatchBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: Vec::new(),
                capacity,
                num_results: 0,
            }),
        }
    }

    pub fn info(&self) -> MatchBufferInfo {
        self.slots.lock().info()
    }

    pub fn capacity(&self) -> usize {
        self.slots.lock().capacity
    }

    pub fn len(&self) -> usize {
        self.slots.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Match> {
        self.slots.lock().entries.get(index).copied()
    }

    /// Copy of the stored matches, in buffer order.
    pub fn matches(&self) -> Vec<Match> {
        self.slots.lock().entries.clone()
    }

    /// Drop every match and reset the result counter.
    pub fn forget(&self) {
        let mut slots = self.slots.lock();
        slots.entries.clear();
        slots.num_results = 0;
    }

    /// Change the capacity. Shrinking keeps the newest matches.
    pub fn resize(&self, capacity: usize) {
        let mut slots = self.slots.lock();
        let used = slots.entries.len();
        if used > capacity {
            slots.entries.drain(..used - capacity);
        }
        slots.capacity = capacity;
    }

    /// Append `m` when there is room, counting it as a result.
    pub fn push(&self, m: Match) -> Result<bool, SearchError> {
        let offer = self.offer(m, None::<&mut StdRng>)?;
        Ok(matches!(offer, Offer::Counted(_)))
    }

    /// Append `m`, or with `rng` keep a uniform sample of everything offered.
    pub(crate) fn offer<R: Rng>(&self, m: Match, rng: Option<&mut R>) -> Result<Offer, SearchError> {
        let mut slots = self.slots.lock();
        let used = slots.entries.len();

        if used < slots.capacity {
            slots
                .entries
                .try_reserve(1)
                .map_err(SearchError::oom("the match buffer"))?;
            slots.num_results += 1;
            slots.entries.push(m);
            if let Some(rng) = rng {
                let slot = rng.random_range(0..=used);
                slots.entries.swap(slot, used);
            }
            return Ok(Offer::Counted(slots.info()));
        }

        let Some(rng) = rng else {
            return Ok(Offer::Full);
        };
        slots.num_results += 1;
        let slot = rng.random_range(0..slots.num_results);
        if slot < used {
            slots.entries[slot] = m;
        }
        Ok(Offer::Counted(slots.info()))
    }
}

/// Document `document` as a match covering all of it.
pub fn match_for_document<C: Corpus + ?Sized>(corpus: &C, document: usize) -> Option<Match> {
    let span = corpus.documents().get(document)?.span;
    Some(Match {
        start: span.low,
        end: span.high,
        focus: span.low,
        document,
        within: span,
    })
}
