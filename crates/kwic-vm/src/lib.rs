#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Search runtime for compiled kwic queries.
//!
//! - [`Searcher`]: incremental, resumable, cancellable search
//! - [`SearchArea`]: index-driven pruning of the positions a search visits
//! - [`MatchBuffer`]: bounded result storage with reservoir sampling and
//!   stable concordance sorting
//!
//! ```
//! use kwic_compiler::Query;
//! use kwic_core::CorpusBuilder;
//! use kwic_vm::{CancellationToken, MatchBuffer, Produced, SearchOptions, Searcher};
//!
//! let mut builder = CorpusBuilder::new(["orth", "pos"]);
//! for token in [["the", "det"], ["quick", "adj"], ["fox", "noun"]] {
//!     builder.push_token(&token).unwrap();
//! }
//! let corpus = builder.build().unwrap();
//!
//! let query = Query::compile("[pos=adj] [pos=noun]", &corpus).unwrap();
//! let buffer = MatchBuffer::new(10);
//! let mut searcher = Searcher::new(&query, &corpus, SearchOptions::default());
//! let token = CancellationToken::new();
//!
//! let outcome = searcher.produce(&buffer, 10, &token, 0, |_| {}).unwrap();
//! assert_eq!(outcome, Produced::Exhausted);
//! assert_eq!(buffer.get(0).map(|m| (m.start, m.end, m.focus)), Some((1, 3, 2)));
//! ```

mod area;
pub mod buffer;
mod cancel;
pub mod engine;

#[cfg(test)]
mod area_tests;

pub use area::SearchArea;
pub use buffer::{
    Match, MatchBuffer, MatchBufferInfo, SortColumn, SortCriteria, SortOutcome,
    match_for_document,
};
pub use cancel::CancellationToken;
pub use engine::{
    Mode, NoopTracer, PrintTracer, Produced, SearchError, SearchOptions, Searcher, Tracer,
    Verbosity,
};
