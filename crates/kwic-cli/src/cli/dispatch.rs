//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors that pull relevant fields (ignoring hidden ones)
//! - `Into<*Args>` impls to bridge dispatch → command handlers
//! - Positional shifting (`-q` shifts the first positional to the corpus)

use std::path::PathBuf;

use clap::ArgMatches;
use kwic_vm::{SortColumn, SortCriteria, Verbosity};

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::exec::ExecArgs;
use crate::commands::pack::PackArgs;
use crate::commands::run_common::SearchArgs;
use crate::commands::trace::TraceArgs;

pub struct DumpParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub color: ColorChoice,
    // Note: search, exec and trace flags are parsed but not extracted
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let (query_path, query_text, corpus_path) = inputs(m);
        Self {
            query_path,
            query_text,
            corpus_path,
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            corpus_path: p.corpus_path,
            color: p.color.should_colorize(),
        }
    }
}

/// Search flags shared by exec and trace.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub limit: usize,
    pub sample: Option<u64>,
    pub nested: bool,
    pub max_length: Option<usize>,
    pub no_index: bool,
    pub config: Option<PathBuf>,
}

impl SearchParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            limit: m.get_one::<usize>("limit").copied().unwrap_or(100),
            sample: m.get_one::<u64>("sample").copied(),
            nested: m.get_flag("nested"),
            max_length: m.get_one::<usize>("max_length").copied(),
            no_index: m.get_flag("no_index"),
            config: m.get_one::<PathBuf>("config").cloned(),
        }
    }
}

impl From<SearchParams> for SearchArgs {
    fn from(p: SearchParams) -> Self {
        Self {
            limit: p.limit,
            sample: p.sample,
            nested: p.nested,
            max_length: p.max_length,
            no_index: p.no_index,
            config: p.config,
        }
    }
}

pub struct ExecParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub search: SearchParams,
    pub sort: Option<SortCriteria>,
    pub context: usize,
    pub json: bool,
    pub compact: bool,
    pub color: ColorChoice,
    // Note: verbose and no_result are parsed but not extracted (trace flags)
}

impl ExecParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let (query_path, query_text, corpus_path) = inputs(m);
        let context = m.get_one::<usize>("context").copied().unwrap_or(5);

        let sort = m
            .get_one::<String>("sort")
            .and_then(|name| parse_column(name))
            .map(|column| {
                SortCriteria::new(column)
                    .ascending(!m.get_flag("desc"))
                    .atergo(m.get_flag("atergo"))
                    .context(context)
            });

        Self {
            // Input (with positional shifting applied)
            query_path,
            query_text,
            corpus_path,

            search: SearchParams::from_matches(m),

            // Output options
            sort,
            context,
            json: m.get_flag("json"),
            compact: m.get_flag("compact"),
            color: parse_color(m),
        }
    }
}

impl From<ExecParams> for ExecArgs {
    fn from(p: ExecParams) -> Self {
        // Pretty by default when stdout is a TTY, unless --compact is passed
        let pretty = !p.compact && std::io::IsTerminal::is_terminal(&std::io::stdout());

        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            corpus_path: p.corpus_path,
            search: p.search.into(),
            sort: p.sort,
            context: p.context,
            json: p.json,
            pretty,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub search: SearchParams,
    pub verbose: u8,
    pub no_result: bool,
    pub color: ColorChoice,
    // Note: sort, json and friends are parsed but not extracted (exec flags)
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let (query_path, query_text, corpus_path) = inputs(m);
        Self {
            query_path,
            query_text,
            corpus_path,
            search: SearchParams::from_matches(m),
            verbose: m.get_count("verbose"),
            no_result: m.get_flag("no_result"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            _ => Verbosity::Verbose,
        };

        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            corpus_path: p.corpus_path,
            search: p.search.into(),
            verbosity,
            no_result: p.no_result,
            color: p.color.should_colorize(),
        }
    }
}

pub struct PackParams {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PackParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().unwrap(),
            output: m.get_one::<PathBuf>("output").cloned().unwrap(),
        }
    }
}

impl From<PackParams> for PackArgs {
    fn from(p: PackParams) -> Self {
        Self {
            input: p.input,
            output: p.output,
        }
    }
}

/// Query path, query text and corpus path, with positional shifting applied.
fn inputs(m: &ArgMatches) -> (Option<PathBuf>, Option<String>, Option<PathBuf>) {
    let query_path = m.get_one::<PathBuf>("query_path").cloned();
    let query_text = m.get_one::<String>("query_text").cloned();
    let corpus_path = m.get_one::<PathBuf>("corpus_path").cloned();

    let (query_path, corpus_path) =
        shift_positional_to_corpus(query_text.is_some(), query_path, corpus_path);
    (query_path, query_text, corpus_path)
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_column(name: &str) -> Option<SortColumn> {
    Some(match name {
        "left-context" => SortColumn::LeftContext,
        "left-match" => SortColumn::LeftMatch,
        "match" => SortColumn::Match,
        "right-match" => SortColumn::RightMatch,
        "right-context" => SortColumn::RightContext,
        _ => return None,
    })
}

/// When -q is used with a single positional arg, shift it from query to corpus.
/// This enables: `kwic exec -q '[pos=noun]' corpus.json`
fn shift_positional_to_corpus(
    has_query_text: bool,
    query_path: Option<PathBuf>,
    corpus_path: Option<PathBuf>,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if has_query_text && query_path.is_some() && corpus_path.is_none() {
        (None, query_path)
    } else {
        (query_path, corpus_path)
    }
}
