use std::fmt::Display;
use std::io;

use kwic_core::CorpusError;
use kwic_vm::SearchError;

/// Failure of a CLI command before or after the search itself.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot load corpus '{path}': {source}")]
    Corpus {
        path: String,
        #[source]
        source: CorpusError,
    },

    #[error("invalid search options in '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Usage(&'static str),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Print `err` and exit with status 1.
pub fn fail(err: impl Display) -> ! {
    eprintln!("error: {}", err);
    std::process::exit(1)
}
