//! Corpus access layer.
//!
//! The search engine consumes a corpus only through the [`Corpus`] trait:
//! per-position attribute symbols, document and sub-document spans, syntax
//! groups and (optionally) positional occurrence lists for index pruning.
//! [`MemoryCorpus`] is the in-memory implementation, loadable from JSON or
//! from a binary snapshot.

mod binary;
mod builder;
mod collation;
mod error;
mod json;
mod memory;


use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Interner, Symbol};

pub use builder::CorpusBuilder;
pub use collation::Collation;
pub use error::CorpusError;
pub use memory::MemoryCorpus;

/// Index of a positional attribute (`orth`, `base`, `pos`, ...).
pub type AttrId = u16;

/// The orthographic form is always attribute 0.
pub const ORTH: AttrId = 0;

/// Half-open range of corpus positions `[low, high)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub low: usize,
    pub high: usize,
}

impl Span {
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.low <= index && index < self.high
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.high.saturating_sub(self.low)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.high <= self.low
    }
}

/// A document: a contiguous run of positions plus metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub span: Span,
    pub meta: IndexMap<Symbol, Symbol>,
}

impl Document {
    pub fn meta(&self, key: Symbol) -> Option<Symbol> {
        self.meta.get(&key).copied()
    }
}

/// Shape of a syntax group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    /// Ordinary phrase with optional syntactic and semantic head positions.
    Simple {
        synh: Option<usize>,
        semh: Option<usize>,
    },
    /// Coordination; its members are the next `members` groups.
    Coordination { members: usize },
    /// The conjunction inside a coordination.
    Conjunction,
}

/// A syntactic group spanning positions `from..=to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxGroup {
    pub from: usize,
    pub to: usize,
    pub group_type: Symbol,
    pub kind: GroupKind,
}

impl SyntaxGroup {
    pub fn span(&self) -> Span {
        Span::new(self.from, self.to + 1)
    }
}

/// Handle to the attributes of one corpus position.
#[derive(Clone, Copy, Debug)]
pub struct Segment<'c> {
    index: usize,
    values: &'c [Symbol],
}

impl<'c> Segment<'c> {
    pub fn new(index: usize, values: &'c [Symbol]) -> Self {
        Self { index, values }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn get(&self, attr: AttrId) -> Option<Symbol> {
        self.values.get(attr as usize).copied()
    }

    #[inline]
    pub fn orth(&self) -> Symbol {
        self.values[ORTH as usize]
    }
}

/// Read access to a tagged corpus.
pub trait Corpus {
    /// Number of positions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn interner(&self) -> &Interner;

    fn attribute(&self, name: &str) -> Option<AttrId>;

    fn attribute_name(&self, attr: AttrId) -> &str;

    /// Distinct values of an attribute, in first-occurrence order.
    fn dictionary(&self, attr: AttrId) -> &[Symbol];

    fn segment(&self, index: usize) -> Option<Segment<'_>>;

    /// Documents in corpus order; together they cover every position.
    fn documents(&self) -> &[Document];

    /// Spans of the sub-documents of `kind` (e.g. `s`, `p`), sorted.
    fn subdocuments(&self, kind: &str) -> Option<&[Span]>;

    /// Syntax groups sorted by `from`.
    fn syntax_groups(&self) -> &[SyntaxGroup];

    /// Distinct group types.
    fn group_types(&self) -> &[Symbol];

    /// Distinct metadata values recorded under `key`.
    fn meta_values(&self, key: Symbol) -> &[Symbol];

    /// Sorted positions where `attr` has `value`, or `None` without an index.
    fn occurrences(&self, attr: AttrId, value: Symbol) -> Option<&[u32]>;

    /// Granule size of the positional index, `None` when not indexed.
    fn granularity(&self) -> Option<usize>;

    fn collation(&self) -> &Collation;
}
