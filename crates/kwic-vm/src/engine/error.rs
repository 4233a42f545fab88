//! Errors that can occur during a search or a sort.

use std::collections::TryReserveError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// A scratch structure (backtrack stack, match buffer, sort keys)
    /// could not grow.
    #[error("out of memory while growing {what}")]
    OutOfMemory {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

impl SearchError {
    pub(crate) fn oom(what: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| SearchError::OutOfMemory { what, source }
    }
}
