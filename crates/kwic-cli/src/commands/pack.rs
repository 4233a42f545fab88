//! Convert a JSON corpus to a binary snapshot.

use std::path::PathBuf;

use kwic_core::Corpus;

use super::corpus_loader::load_corpus;
use super::error::{CliError, fail};

pub struct PackArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

pub fn run(args: PackArgs) {
    if let Err(e) = pack(&args) {
        fail(e);
    }
}

pub fn pack(args: &PackArgs) -> Result<(), CliError> {
    let corpus = load_corpus(Some(&args.input))?;
    corpus
        .write_snapshot(&args.output)
        .map_err(|source| CliError::Corpus {
            path: args.output.to_string_lossy().into_owned(),
            source,
        })?;
    tracing::info!(
        output = %args.output.display(),
        positions = corpus.len(),
        "snapshot written"
    );
    Ok(())
}
