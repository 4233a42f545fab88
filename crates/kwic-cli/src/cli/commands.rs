//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! dump/exec/trace accept each other's flags, with irrelevant ones hidden
//! from `--help`, so a command line can be switched between them by changing
//! the subcommand alone.

use clap::Command;

use super::args::*;

/// Add hidden search args (for commands that don't search).
fn with_hidden_search_args(cmd: Command) -> Command {
    cmd.arg(limit_arg().hide(true))
        .arg(sample_arg().hide(true))
        .arg(nested_arg().hide(true))
        .arg(max_length_arg().hide(true))
        .arg(no_index_arg().hide(true))
        .arg(config_arg().hide(true))
}

/// Add hidden exec output args (for commands that don't list results).
fn with_hidden_exec_args(cmd: Command) -> Command {
    cmd.arg(sort_arg().hide(true))
        .arg(desc_arg().hide(true))
        .arg(atergo_arg().hide(true))
        .arg(context_arg().hide(true))
        .arg(json_arg().hide(true))
        .arg(compact_arg().hide(true))
}

/// Add hidden trace args (for commands that don't trace).
fn with_hidden_trace_args(cmd: Command) -> Command {
    cmd.arg(verbose_arg().hide(true))
        .arg(no_result_arg().hide(true))
}

fn with_search_args(cmd: Command) -> Command {
    cmd.arg(limit_arg())
        .arg(sample_arg())
        .arg(nested_arg())
        .arg(max_length_arg())
        .arg(no_index_arg())
        .arg(config_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("kwic")
        .about("Concordance queries over tagged corpora")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(exec_command())
        .subcommand(trace_command())
        .subcommand(pack_command())
}

/// Show the compiled automata.
///
/// Accepts all runtime flags, but only uses query/corpus/color.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show the symbols, NFA and DFA of a query")
        .override_usage(
            "\
  kwic dump <QUERY> <CORPUS>
  kwic dump -q <TEXT> <CORPUS>",
        )
        .after_help(
            r#"EXAMPLES:
  kwic dump query.kwic corpus.json            # query from file
  kwic dump -q '[pos=adj]+ [pos=noun]' c.kwc  # inline query"#,
        )
        .arg(query_path_arg())
        .arg(corpus_path_arg())
        .arg(query_text_arg())
        .arg(color_arg());

    with_hidden_trace_args(with_hidden_exec_args(with_hidden_search_args(cmd)))
}

/// Search a corpus and list the results.
///
/// Accepts trace flags, but ignores them.
pub fn exec_command() -> Command {
    let cmd = Command::new("exec")
        .about("Search a corpus and print a concordance")
        .override_usage(
            "\
  kwic exec <QUERY> <CORPUS>
  kwic exec -q <TEXT> <CORPUS>",
        )
        .after_help(
            r#"EXAMPLES:
  kwic exec query.kwic corpus.json                 # first 100 results
  kwic exec -q '[pos=noun]' c.kwc -n 20 --sample 7  # random sample of 20
  kwic exec -q '[pos=noun]' c.kwc --sort right-context --atergo
  kwic exec -q '"fox"' c.kwc --json                 # machine-readable"#,
        )
        .arg(query_path_arg())
        .arg(corpus_path_arg())
        .arg(query_text_arg())
        .arg(color_arg())
        .arg(sort_arg())
        .arg(desc_arg())
        .arg(atergo_arg())
        .arg(context_arg())
        .arg(json_arg())
        .arg(compact_arg());

    with_hidden_trace_args(with_search_args(cmd))
}

/// Trace a search for debugging.
///
/// Accepts exec output flags, but ignores them.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Trace a search for debugging")
        .override_usage(
            "\
  kwic trace <QUERY> <CORPUS>
  kwic trace -q <TEXT> <CORPUS>",
        )
        .after_help(
            r#"EXAMPLES:
  kwic trace query.kwic corpus.json       # successful steps
  kwic trace -q '[pos=adj] [pos=noun]' c.kwc -v  # every link test"#,
        )
        .arg(query_path_arg())
        .arg(corpus_path_arg())
        .arg(query_text_arg())
        .arg(color_arg())
        .arg(verbose_arg())
        .arg(no_result_arg());

    with_hidden_exec_args(with_search_args(cmd))
}

/// Convert a JSON corpus to a binary snapshot.
pub fn pack_command() -> Command {
    Command::new("pack")
        .about("Convert a JSON corpus to a binary snapshot")
        .after_help(
            r#"EXAMPLES:
  kwic pack corpus.json -o corpus.kwc"#,
        )
        .arg(pack_input_arg())
        .arg(output_file_arg())
}
