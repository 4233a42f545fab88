//! Trace a search for debugging.

use std::path::PathBuf;

use kwic_vm::{CancellationToken, PrintTracer, Verbosity};

use super::error::fail;
use super::exec::print_lines;
use super::run_common::{self, QueryInput, SearchArgs};

/// Context width of the result listing after the trace.
const RESULT_CONTEXT: usize = 3;

pub struct TraceArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub search: SearchArgs,
    pub verbosity: Verbosity,
    pub no_result: bool,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let prepared = run_common::prepare_query(QueryInput {
        query_path: args.query_path.as_deref(),
        query_text: args.query_text.as_deref(),
        corpus_path: args.corpus_path.as_deref(),
        color: args.color,
    });

    let mut tracer = PrintTracer::new(&prepared.query, &prepared.corpus, args.verbosity);
    let token = CancellationToken::new();
    let run = match run_common::run_search(&prepared, &args.search, &token, &mut tracer) {
        Ok(run) => {
            tracer.print();
            run
        }
        Err(e) => {
            tracer.print();
            fail(e);
        }
    };

    if args.no_result {
        return;
    }

    println!("---");
    print_lines(&prepared.corpus, &run.buffer.matches(), RESULT_CONTEXT);
    eprintln!("{}", run_common::summary(&run));
}
