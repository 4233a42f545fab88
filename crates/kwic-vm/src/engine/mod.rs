//! Search engine for compiled queries.
//!
//! A [`Searcher`] runs one query over one corpus, emitting [`Match`]es into a
//! [`MatchBuffer`](crate::MatchBuffer) a bounded batch at a time.
//!
//! [`Match`]: crate::Match

mod context;
mod error;
mod options;
mod searcher;
mod trace;

#[cfg(test)]
mod trace_tests;

pub use context::SearchContext;
pub use error::SearchError;
pub use options::SearchOptions;
pub use searcher::{Mode, Produced, Searcher};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
