//! Corpus loading: JSON by extension, binary snapshots otherwise.

use std::fs;
use std::path::Path;

use kwic_core::{Corpus, MemoryCorpus};

use super::error::CliError;

pub fn load_corpus(path: Option<&Path>) -> Result<MemoryCorpus, CliError> {
    let Some(path) = path else {
        return Err(CliError::Usage(
            "corpus is required: pass it as the last positional argument",
        ));
    };
    let name = path.to_string_lossy().into_owned();

    let corpus = if is_json(path) {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: name.clone(),
            source,
        })?;
        MemoryCorpus::from_json(&text)
    } else {
        MemoryCorpus::open(path)
    }
    .map_err(|source| CliError::Corpus {
        path: name.clone(),
        source,
    })?;

    tracing::info!(
        path = %name,
        positions = corpus.len(),
        documents = corpus.documents().len(),
        granularity = ?corpus.granularity(),
        "corpus loaded"
    );
    Ok(corpus)
}

pub fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
