//! Search a corpus and print a concordance.

use std::path::PathBuf;

use serde::Serialize;

use kwic_core::MemoryCorpus;
use kwic_vm::{
    CancellationToken, Match, MatchBufferInfo, NoopTracer, Produced, SortCriteria, SortOutcome,
};

use super::error::fail;
use super::run_common::{self, Concordance, PreparedQuery, QueryInput, SearchArgs, SearchRun};

pub struct ExecArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub search: SearchArgs,
    pub sort: Option<SortCriteria>,
    pub context: usize,
    pub json: bool,
    pub pretty: bool,
    pub color: bool,
}

#[derive(Serialize)]
struct Report {
    info: MatchBufferInfo,
    outcome: &'static str,
    lines: Vec<Line>,
}

#[derive(Serialize)]
struct Line {
    #[serde(flatten)]
    m: Match,
    left: String,
    text: String,
    right: String,
}

pub fn run(args: ExecArgs) {
    let prepared = run_common::prepare_query(QueryInput {
        query_path: args.query_path.as_deref(),
        query_text: args.query_text.as_deref(),
        corpus_path: args.corpus_path.as_deref(),
        color: args.color,
    });

    let token = CancellationToken::new();
    let run = run_common::run_search(&prepared, &args.search, &token, &mut NoopTracer)
        .unwrap_or_else(|e| fail(e));

    if let Some(criteria) = &args.sort {
        match run.buffer.sort(&prepared.corpus, criteria, &token) {
            Ok(SortOutcome::Sorted) => {}
            Ok(SortOutcome::Cancelled) => tracing::warn!("sort cancelled, results left unsorted"),
            Err(e) => fail(e),
        }
    }

    if args.json {
        print_json(&prepared, &run, args.context, args.pretty);
    } else {
        print_lines(&prepared.corpus, &run.buffer.matches(), args.context);
        eprintln!("{}", run_common::summary(&run));
    }
}

/// Print one concordance line per match, prefixed with its document.
pub fn print_lines(corpus: &MemoryCorpus, matches: &[Match], context: usize) {
    for m in matches {
        let line = Concordance::new(corpus, m, context);
        println!("{}:{}  {}", m.document, m.start, line.render());
    }
}

fn print_json(prepared: &PreparedQuery, run: &SearchRun, context: usize, pretty: bool) {
    match render_json(prepared, run, context, pretty) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("JSON serialization failed: {}", e)),
    }
}

/// The `--json` report: buffer counters, outcome and one entry per match.
pub fn render_json(
    prepared: &PreparedQuery,
    run: &SearchRun,
    context: usize,
    pretty: bool,
) -> serde_json::Result<String> {
    let lines = run
        .buffer
        .matches()
        .into_iter()
        .map(|m| {
            let Concordance { left, text, right } = Concordance::new(&prepared.corpus, &m, context);
            Line {
                m,
                left,
                text,
                right,
            }
        })
        .collect();
    let report = Report {
        info: run.buffer.info(),
        outcome: outcome_name(run.outcome),
        lines,
    };

    if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
}

fn outcome_name(outcome: Produced) -> &'static str {
    match outcome {
        Produced::Exhausted => "exhausted",
        Produced::LimitReached => "limit_reached",
        Produced::BufferFull => "buffer_full",
        Produced::Cancelled => "cancelled",
    }
}
