use std::fs;
use std::io::{self, Read};
use std::path::Path;

use super::error::CliError;

/// Query text plus the name diagnostics show for it.
#[derive(Debug)]
pub struct QuerySource {
    pub text: String,
    /// `None` for inline queries.
    pub name: Option<String>,
}

pub fn load_query_source(
    query_path: Option<&Path>,
    query_text: Option<&str>,
) -> Result<QuerySource, CliError> {
    if let Some(text) = query_text {
        return Ok(QuerySource {
            text: text.to_owned(),
            name: None,
        });
    }

    match query_path {
        Some(path) if path.as_os_str() == "-" => load_stdin(),
        Some(path) => load_file(path),
        None => Err(CliError::Usage(
            "query is required: use positional argument or -q/--query",
        )),
    }
}

fn load_stdin() -> Result<QuerySource, CliError> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|source| CliError::Read {
            path: "<stdin>".to_owned(),
            source,
        })?;
    Ok(QuerySource {
        text: buf,
        name: Some("<stdin>".to_owned()),
    })
}

fn load_file(path: &Path) -> Result<QuerySource, CliError> {
    let name = path.to_string_lossy().into_owned();
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: name.clone(),
        source,
    })?;
    Ok(QuerySource {
        text,
        name: Some(name),
    })
}
