use kwic_compiler::Query;
use kwic_core::{CorpusBuilder, GroupKind, MemoryCorpus};

use super::{PrintTracer, SearchOptions, Searcher, Verbosity};
use crate::{CancellationToken, MatchBuffer};

fn corpus(tokens: &[[&str; 2]], groups: &[(usize, usize, &str)]) -> MemoryCorpus {
    let mut builder = CorpusBuilder::new(["orth", "pos"]);
    builder.begin_document([("source", "test")]);
    for token in tokens {
        builder.push_token(token).unwrap();
    }
    for &(from, to, ty) in groups {
        builder.group(
            from,
            to,
            ty,
            GroupKind::Simple {
                synh: None,
                semh: None,
            },
        );
    }
    builder.build().unwrap()
}

fn trace(corpus: &MemoryCorpus, source: &str, verbosity: Verbosity) -> Vec<String> {
    let query = Query::compile(source, corpus).unwrap();
    let buffer = MatchBuffer::new(10);
    let mut searcher = Searcher::new(&query, corpus, SearchOptions::default());
    let mut tracer = PrintTracer::new(&query, corpus, verbosity);
    searcher
        .produce_with(
            &buffer,
            usize::MAX,
            &CancellationToken::new(),
            0,
            |_| {},
            &mut tracer,
        )
        .unwrap();
    tracer.into_lines()
}

fn quick_fox() -> MemoryCorpus {
    corpus(&[["the", "det"], ["quick", "adj"], ["fox", "noun"]], &[])
}

#[test]
fn default_shows_successful_steps() {
    let lines = trace(&quick_fox(), "[pos=adj] [pos=noun]", Verbosity::Default);

    assert_eq!(
        lines,
        [
            "    1  S0 → S1    pos=adj          quick",
            "    2  S1 → S2    pos=noun^        fox",
            "    ●  1..3 ^2  quick fox",
            "    ■  exhausted",
        ]
    );
}

#[test]
fn verbose_adds_failures_and_restarts() {
    let lines = trace(&quick_fox(), "[pos=adj] [pos=noun]", Verbosity::Verbose);

    assert_eq!(
        lines,
        [
            "  ▶  @0",
            "    0  S0 ✗       pos=adj          the",
            "    1  S0 → S1    pos=adj          quick",
            "    2  S1 → S2    pos=noun^        fox",
            "    ●  1..3 ^2  quick fox",
            "  ▶  @3",
            "    ■  exhausted",
        ]
    );
}

#[test]
fn phrase_steps_show_the_group() {
    let corpus = corpus(
        &[["the", "det"], ["fox", "noun"], ["runs", "verb"]],
        &[(0, 1, "NP")],
    );
    let lines = trace(&corpus, "<type=NP> [pos=verb]", Verbosity::Default);

    assert_eq!(lines.len(), 4, "{lines:#?}");
    assert!(lines[0].starts_with("    0  S0 → S1"), "{}", lines[0]);
    assert!(lines[0].ends_with("<the fox>"), "{}", lines[0]);
    assert_eq!(lines[1], "    2  S1 → S2    pos=verb^        runs");
    assert_eq!(lines[2], "    ●  0..3 ^2  the fox runs");
}

#[test]
fn noop_and_print_tracers_agree() {
    let corpus = quick_fox();
    let query = Query::compile("[pos=adj] [pos=noun]", &corpus).unwrap();
    let token = CancellationToken::new();

    let plain = MatchBuffer::new(10);
    Searcher::new(&query, &corpus, SearchOptions::default())
        .produce(&plain, usize::MAX, &token, 0, |_| {})
        .unwrap();

    let traced = MatchBuffer::new(10);
    let mut tracer = PrintTracer::new(&query, &corpus, Verbosity::Verbose);
    Searcher::new(&query, &corpus, SearchOptions::default())
        .produce_with(&traced, usize::MAX, &token, 0, |_| {}, &mut tracer)
        .unwrap();

    assert_eq!(plain.matches(), traced.matches());
    assert!(!tracer.lines().is_empty());
}
