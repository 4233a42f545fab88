use std::path::PathBuf;

use super::run_common::{self, QueryInput};

pub struct DumpArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let prepared = run_common::prepare_query(QueryInput {
        query_path: args.query_path.as_deref(),
        query_text: args.query_text.as_deref(),
        corpus_path: args.corpus_path.as_deref(),
        color: args.color,
    });
    print!("{}", prepared.query.dump());
}
