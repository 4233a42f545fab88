#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for the kwic corpus query engine.
//!
//! - [`Interner`]/[`Symbol`]: every corpus string is interned once
//! - [`BitSet`]: fixed-width sets for automaton closures and predicate values
//! - [`corpus`]: the [`Corpus`] trait and the in-memory implementation

mod bitset;
pub mod corpus;
mod interner;


pub use bitset::BitSet;
pub use corpus::{
    AttrId, Collation, Corpus, CorpusBuilder, CorpusError, Document, GroupKind, MemoryCorpus,
    ORTH, Segment, Span, SyntaxGroup,
};
pub use interner::{Interner, Symbol};
