//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! This allows the same arg definition to be reused across commands with
//! different visibility settings (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Query file (positional).
pub fn query_path_arg() -> Arg {
    Arg::new("query_path")
        .value_name("QUERY")
        .value_parser(value_parser!(PathBuf))
        .help("Query file (`-` for stdin)")
}

/// Inline query text (-q/--query).
pub fn query_text_arg() -> Arg {
    Arg::new("query_text")
        .short('q')
        .long("query")
        .value_name("TEXT")
        .help("Inline query text")
}

/// Corpus to search (positional).
pub fn corpus_path_arg() -> Arg {
    Arg::new("corpus_path")
        .value_name("CORPUS")
        .value_parser(value_parser!(PathBuf))
        .help("Corpus file: JSON (`.json`) or a binary snapshot")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Buffer capacity (-n/--limit).
pub fn limit_arg() -> Arg {
    Arg::new("limit")
        .short('n')
        .long("limit")
        .value_name("N")
        .default_value("100")
        .value_parser(value_parser!(usize))
        .help("Maximum number of results kept")
}

/// Reservoir sampling seed (--sample).
pub fn sample_arg() -> Arg {
    Arg::new("sample")
        .long("sample")
        .value_name("SEED")
        .value_parser(value_parser!(u64))
        .help("Keep a uniform random sample of all results")
}

/// Report nested results (--nested).
pub fn nested_arg() -> Arg {
    Arg::new("nested")
        .long("nested")
        .action(ArgAction::SetTrue)
        .help("Also report matches nested inside reported ones")
}

/// Longest match (--max-length).
pub fn max_length_arg() -> Arg {
    Arg::new("max_length")
        .long("max-length")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Longest match, in positions")
}

/// Disable the positional index (--no-index).
pub fn no_index_arg() -> Arg {
    Arg::new("no_index")
        .long("no-index")
        .action(ArgAction::SetTrue)
        .help("Scan every position instead of consulting the index")
}

/// Search options file (--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON search options; flags override its values")
}

/// Sort column (--sort).
pub fn sort_arg() -> Arg {
    Arg::new("sort")
        .long("sort")
        .value_name("COLUMN")
        .value_parser([
            "left-context",
            "left-match",
            "match",
            "right-match",
            "right-context",
        ])
        .help("Sort results by a column")
}

/// Descending sort (--desc).
pub fn desc_arg() -> Arg {
    Arg::new("desc")
        .long("desc")
        .action(ArgAction::SetTrue)
        .help("Sort in descending order")
}

/// Compare word forms from their ends (--atergo).
pub fn atergo_arg() -> Arg {
    Arg::new("atergo")
        .long("atergo")
        .action(ArgAction::SetTrue)
        .help("Sort a tergo (by reversed word forms)")
}

/// Context width (--context).
pub fn context_arg() -> Arg {
    Arg::new("context")
        .long("context")
        .value_name("N")
        .default_value("5")
        .value_parser(value_parser!(usize))
        .help("Positions of context shown and sorted on")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output results as JSON")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON (default: pretty when stdout is a TTY)")
}

/// Verbosity level (-v).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v also shows failed tests and restarts)")
}

/// Skip the result listing (--no-result).
pub fn no_result_arg() -> Arg {
    Arg::new("no_result")
        .long("no-result")
        .action(ArgAction::SetTrue)
        .help("Show the trace only")
}

/// JSON corpus to pack (positional).
pub fn pack_input_arg() -> Arg {
    Arg::new("input")
        .value_name("JSON")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Corpus in JSON form")
}

/// Snapshot destination (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Write the snapshot to file")
}
