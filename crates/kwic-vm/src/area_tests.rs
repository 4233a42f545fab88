use kwic_compiler::Query;
use kwic_core::{Corpus, CorpusBuilder, GroupKind, MemoryCorpus};

use crate::area::SearchArea;

/// Sixteen positions in granules of four:
///
/// ```text
/// 0 | the quick brown fox
/// 1 | jumps over the lazy
/// 2 | dog a fox sleeps
/// 3 | . the red hen
/// ```
fn corpus(granularity: Option<usize>) -> MemoryCorpus {
    let mut builder = CorpusBuilder::new(["orth", "pos"]);
    builder.granularity(granularity);
    builder.begin_document([("author", "aesop")]);
    for (orth, pos) in [
        ("the", "det"),
        ("quick", "adj"),
        ("brown", "adj"),
        ("fox", "noun"),
        ("jumps", "verb"),
        ("over", "prep"),
        ("the", "det"),
        ("lazy", "adj"),
        ("dog", "noun"),
        ("a", "det"),
        ("fox", "noun"),
        ("sleeps", "verb"),
        (".", "interp"),
        ("the", "det"),
        ("red", "adj"),
        ("hen", "noun"),
    ] {
        builder.push_token(&[orth, pos]).unwrap();
    }
    builder.group(
        0,
        3,
        "NP",
        GroupKind::Simple {
            synh: Some(3),
            semh: Some(3),
        },
    );
    builder.build().unwrap()
}

fn granules(source: &str, threshold: usize) -> Vec<usize> {
    let corpus = corpus(Some(4));
    let query = Query::compile(source, &corpus).unwrap();
    let area = SearchArea::build(&query, &corpus, threshold);
    (0..corpus.len())
        .step_by(area.granularity())
        .filter(|&p| area.contains(p))
        .map(|p| p / area.granularity())
        .collect()
}

#[test]
fn single_value() {
    assert_eq!(granules("[orth=fox]", 200), [0, 2]);
}

#[test]
fn offsets_follow_the_distance() {
    // `fox` one position after the start: starts at 2 and 9.
    assert_eq!(granules("[pos=det] [orth=fox]", 200), [0, 2]);
    // `hen` two positions after the start: 13.
    assert_eq!(granules("[] [] [orth=hen]", 200), [3]);
}

#[test]
fn alternatives_unite() {
    assert_eq!(granules("[orth=hen | orth=fox]", 200), [0, 2, 3]);
    assert_eq!(granules("[orth=hen] | [orth=dog]", 200), [2, 3]);
}

#[test]
fn conjunctions_intersect() {
    assert_eq!(granules("[orth=fox & pos=noun]", 200), [0, 2]);
    assert_eq!(granules("[orth=the & pos=det]", 200), [0, 1, 3]);
}

#[test]
fn unindexable_labels_leave_the_area_open() {
    assert_eq!(granules("[orth!=fox]", 200), [0, 1, 2, 3]);
    assert_eq!(granules("[]", 200), [0, 1, 2, 3]);
    assert_eq!(granules("<type=NP> [orth=jumps]", 200), [0, 1, 2, 3]);
}

#[test]
fn threshold_limits_lookups() {
    assert_eq!(granules("[orth=\"h.*\"]", 200), [3]);
    assert_eq!(granules("[orth=\".*\"]", 5), [0, 1, 2, 3]);
}

#[test]
fn unindexed_corpus_is_one_granule() {
    let corpus = corpus(None);
    let query = Query::compile("[orth=fox]", &corpus).unwrap();
    let area = SearchArea::build(&query, &corpus, 200);

    assert_eq!(area.len(), 1);
    assert_eq!(area.granularity(), 16);
    assert_eq!(area.next_candidate(5), Some(5));
}

#[test]
fn next_candidate_skips_excluded_granules() {
    let corpus = corpus(Some(4));
    let query = Query::compile("[orth=fox]", &corpus).unwrap();
    let area = SearchArea::build(&query, &corpus, 200);

    assert_eq!(area.len(), 2);
    assert_eq!(area.next_candidate(1), Some(1));
    assert_eq!(area.next_candidate(4), Some(8));
    assert_eq!(area.next_candidate(9), Some(9));
    assert_eq!(area.next_candidate(12), None);
}

#[test]
fn unrestricted_area() {
    let area = SearchArea::unrestricted(0);

    assert_eq!(area.granularity(), 1);
    assert!(area.contains(0));
    assert!(!area.is_empty());
}
