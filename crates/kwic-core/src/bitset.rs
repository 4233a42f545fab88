//! Fixed-width bitset over dense indices.
//!
//! Used for automaton closure sets (NFA node ids) and for predicate symbol
//! sets (interner indices). Two sets compare equal iff they were created with
//! the same width and hold the same members, which makes a `BitSet` usable as
//! a map key for subset construction.

use std::fmt;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Empty set able to hold indices `0..len`.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Set holding every index in `0..len`.
    pub fn full(len: usize) -> Self {
        let mut set = Self::new(len);
        for i in 0..len {
            set.insert(i);
        }
        set
    }

    /// Width of the set (exclusive upper bound of storable indices).
    #[inline]
    pub fn width(&self) -> usize {
        self.len
    }

    /// Insert `index`, returning true if it was absent.
    ///
    /// # Panics
    /// Panics if `index` is outside the set's width.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.len, "bit {index} out of range {}", self.len);
        let (word, mask) = (index / 64, 1u64 << (index % 64));
        let was_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        !was_set
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// In-place union. Both sets must have the same width.
    pub fn union_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * 64 + bit)
            })
        })
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
