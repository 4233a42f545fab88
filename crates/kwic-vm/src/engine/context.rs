//! Search position and match candidates.
//!
//! A [`SearchContext`] is the whole state of one match attempt. Saving a
//! backtrack point means pushing a copy; it is small and `Copy`.

use kwic_compiler::StateId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchContext {
    /// Corpus position being tested.
    pub index: usize,
    pub state: StateId,
    /// Next link of `state` to try.
    pub link: usize,
    /// Resume cursor into the syntax groups while a phrase link is retried.
    pub phrase: Option<usize>,

    pub match_start: Option<usize>,
    /// End of the longest match found so far in this attempt.
    pub match_end: Option<usize>,
    pub match_focus: Option<usize>,
    /// Focus recorded along the current path, promoted at final states.
    pub focus_candidate: Option<usize>,

    /// Document containing `index`.
    pub document: usize,
    /// Sub-document containing `index` under `within <kind>`.
    pub subdocument: usize,
    /// Scope group under `within <phrase>`.
    pub group: Option<usize>,
}

impl SearchContext {
    pub fn new(start: StateId) -> Self {
        Self {
            index: 0,
            state: start,
            link: 0,
            phrase: None,
            match_start: None,
            match_end: None,
            match_focus: None,
            focus_candidate: None,
            document: 0,
            subdocument: 0,
            group: None,
        }
    }

    /// Move along a link to `target`.
    #[inline]
    pub fn follow(&mut self, target: StateId) {
        self.state = target;
        self.link = 0;
        self.phrase = None;
        self.match_start.get_or_insert(self.index);
    }

    /// Record `index` as the end of a complete match.
    #[inline]
    pub fn promote(&mut self) {
        self.match_end = Some(self.index);
        self.match_focus = self.focus_candidate;
    }

    pub fn clear_candidates(&mut self) {
        self.match_start = None;
        self.match_end = None;
        self.match_focus = None;
        self.focus_candidate = None;
    }
}
