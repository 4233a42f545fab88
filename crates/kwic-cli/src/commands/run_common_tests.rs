use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use kwic_compiler::Query;
use kwic_core::{CorpusBuilder, MemoryCorpus, Span};
use kwic_vm::{CancellationToken, Match, NoopTracer, Produced, SearchOptions};

use super::error::CliError;
use super::run_common::{
    Concordance, PreparedQuery, SearchArgs, run_search, search_options, summary,
};

fn corpus() -> MemoryCorpus {
    let mut builder = CorpusBuilder::new(["orth", "pos"]);
    builder.begin_document([("author", "aesop")]);
    for token in [
        ["the", "det"],
        ["quick", "adj"],
        ["fox", "noun"],
        ["runs", "verb"],
    ] {
        builder.push_token(&token).unwrap();
    }
    builder.begin_document([("author", "grimm")]);
    for token in [["a", "det"], ["red", "adj"], ["hen", "noun"]] {
        builder.push_token(&token).unwrap();
    }
    builder.build().unwrap()
}

fn prepared(source: &str) -> PreparedQuery {
    let corpus = corpus();
    let query = Query::compile(source, &corpus).unwrap();
    PreparedQuery { corpus, query }
}

fn args(limit: usize) -> SearchArgs {
    SearchArgs {
        limit,
        ..SearchArgs::default()
    }
}

fn at(start: usize, end: usize, focus: usize, document: usize) -> Match {
    Match {
        start,
        end,
        focus,
        document,
        within: Span::new(0, 7),
    }
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.json");
    fs::write(
        &path,
        indoc! {r#"
            { "max_match_length": 50, "unindex_threshold": 10 }
        "#},
    )
    .unwrap();

    let options = search_options(&SearchArgs {
        config: Some(path),
        max_length: Some(7),
        no_index: true,
        ..args(10)
    })
    .unwrap();

    assert_eq!(
        options,
        SearchOptions::new()
            .max_match_length(7)
            .unindex_threshold(10)
            .use_index(false)
    );
}

#[test]
fn no_flags_means_defaults() {
    let options = search_options(&args(10)).unwrap();
    assert_eq!(options, SearchOptions::default());
}

#[test]
fn bad_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.json");
    fs::write(&path, r#"{ "max_length": 5 }"#).unwrap();

    let err = search_options(&SearchArgs {
        config: Some(path),
        ..args(10)
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Config { .. }));
}

#[test]
fn missing_config_is_read_error() {
    let err = search_options(&SearchArgs {
        config: Some(PathBuf::from("/nonexistent/search.json")),
        ..args(10)
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}

#[test]
fn search_runs_to_exhaustion() {
    let prepared = prepared("[pos=adj] [pos=noun]");
    let run = run_search(&prepared, &args(10), &CancellationToken::new(), &mut NoopTracer)
        .unwrap();

    assert_eq!(run.outcome, Produced::Exhausted);
    assert_eq!(
        run.buffer
            .matches()
            .iter()
            .map(|m| (m.start, m.end))
            .collect::<Vec<_>>(),
        [(1, 3), (5, 7)]
    );
    assert_eq!(summary(&run), "2 results");
}

#[test]
fn search_stops_at_limit() {
    let prepared = prepared("[pos=noun]");
    let run =
        run_search(&prepared, &args(1), &CancellationToken::new(), &mut NoopTracer).unwrap();

    assert_eq!(run.outcome, Produced::BufferFull);
    assert_eq!(run.buffer.len(), 1);
    assert_eq!(summary(&run), "first 1 results (limit reached)");
}

#[test]
fn sampled_search_counts_everything() {
    let prepared = prepared("[]");
    let run = run_search(
        &prepared,
        &SearchArgs {
            sample: Some(3),
            ..args(2)
        },
        &CancellationToken::new(),
        &mut NoopTracer,
    )
    .unwrap();

    assert_eq!(run.outcome, Produced::Exhausted);
    assert_eq!(summary(&run), "2 sampled of 7 results");
}

#[test]
fn concordance_clips_context_to_document() {
    let corpus = corpus();

    let line = Concordance::new(&corpus, &at(1, 3, 2, 0), 5);
    assert_eq!(line.left, "the");
    assert_eq!(line.text, "quick ^fox");
    assert_eq!(line.right, "runs");
    assert_eq!(line.render(), "the [quick ^fox] runs");

    let line = Concordance::new(&corpus, &at(4, 5, 4, 1), 1);
    assert_eq!(line.render(), "[a] red");
}

#[test]
fn concordance_without_right_context() {
    let corpus = corpus();
    let line = Concordance::new(&corpus, &at(5, 7, 5, 1), 2);
    assert_eq!(line.render(), "a [^red hen]");
}
