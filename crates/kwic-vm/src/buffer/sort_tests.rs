use kwic_core::{CorpusBuilder, MemoryCorpus, Span};

use super::{Match, MatchBuffer, SortColumn, SortCriteria, SortOutcome};
use crate::CancellationToken;

/// `b a c ab ba a`
fn corpus() -> MemoryCorpus {
    let mut builder = CorpusBuilder::new(["orth"]);
    builder.begin_document([("id", "1")]);
    for orth in ["b", "a", "c", "ab", "ba", "a"] {
        builder.push_token(&[orth]).unwrap();
    }
    builder.build().unwrap()
}

fn span(start: usize, end: usize) -> Match {
    Match {
        start,
        end,
        focus: start,
        document: 0,
        within: Span::new(0, 6),
    }
}

fn buffer(matches: &[Match]) -> MatchBuffer {
    let buffer = MatchBuffer::new(matches.len());
    for &m in matches {
        buffer.offer::<rand::rngs::StdRng>(m, None).unwrap();
    }
    buffer
}

fn tokens() -> MatchBuffer {
    buffer(&(0..6).map(|p| span(p, p + 1)).collect::<Vec<_>>())
}

fn sorted(buffer: &MatchBuffer, criteria: SortCriteria) -> Vec<(usize, usize)> {
    let outcome = buffer
        .sort(&corpus(), &criteria, &CancellationToken::new())
        .unwrap();
    assert_eq!(outcome, SortOutcome::Sorted);
    buffer.matches().iter().map(|m| (m.start, m.end)).collect()
}

fn starts(buffer: &MatchBuffer, criteria: SortCriteria) -> Vec<usize> {
    sorted(buffer, criteria).into_iter().map(|(s, _)| s).collect()
}

#[test]
fn match_column_ascending_is_stable() {
    let starts = starts(&tokens(), SortCriteria::new(SortColumn::Match));
    assert_eq!(starts, [1, 5, 3, 0, 4, 2]);
}

#[test]
fn descending_keeps_ties_in_order() {
    let criteria = SortCriteria::new(SortColumn::Match).ascending(false);
    assert_eq!(starts(&tokens(), criteria), [2, 4, 0, 3, 1, 5]);
}

#[test]
fn atergo_compares_reversed_forms() {
    let criteria = SortCriteria::new(SortColumn::Match).atergo(true);
    assert_eq!(starts(&tokens(), criteria), [1, 5, 4, 0, 3, 2]);
}

#[test]
fn right_context_puts_empty_first() {
    let criteria = SortCriteria::new(SortColumn::RightContext).context(1);
    assert_eq!(starts(&tokens(), criteria), [5, 0, 4, 2, 3, 1]);
}

#[test]
fn left_context_of_first_position_is_empty() {
    let criteria = SortCriteria::new(SortColumn::LeftContext).context(1);
    // Left neighbours: - b a c ab ba
    assert_eq!(starts(&tokens(), criteria), [0, 2, 4, 1, 5, 3]);
}

#[test]
fn sequences_compare_shorter_prefix_first() {
    let buffer = buffer(&[span(0, 2), span(1, 3), span(3, 5), span(4, 6), span(1, 2)]);

    assert_eq!(
        sorted(&buffer, SortCriteria::new(SortColumn::Match)),
        [(1, 2), (1, 3), (3, 5), (0, 2), (4, 6)]
    );
}

#[test]
fn atergo_sequences_compare_from_the_end() {
    let buffer = buffer(&[span(0, 2), span(1, 3), span(3, 5), span(4, 6), span(1, 2)]);
    let criteria = SortCriteria::new(SortColumn::Match).atergo(true);

    assert_eq!(
        sorted(&buffer, criteria),
        [(1, 2), (4, 6), (0, 2), (3, 5), (1, 3)]
    );
}

#[test]
fn repeated_sorts_order_by_several_columns() {
    let buffer = tokens();
    sorted(&buffer, SortCriteria::new(SortColumn::RightContext).context(1));
    assert_eq!(
        starts(&buffer, SortCriteria::new(SortColumn::Match)),
        [5, 1, 3, 0, 4, 2]
    );
}

#[test]
fn match_halves_split_at_focus() {
    let mut a = span(0, 3);
    a.focus = 1;
    let mut b = span(2, 5);
    b.focus = 4;
    let buffer = buffer(&[a, b]);

    // Left halves: [b] and [c ab]; right halves: [a c] and [ba].
    assert_eq!(
        starts(&buffer, SortCriteria::new(SortColumn::LeftMatch)),
        [0, 2]
    );
    assert_eq!(
        starts(&buffer, SortCriteria::new(SortColumn::RightMatch)),
        [0, 2]
    );
    assert_eq!(
        starts(&buffer, SortCriteria::new(SortColumn::RightMatch).ascending(false)),
        [2, 0]
    );
}

#[test]
fn cancelled_sort_leaves_buffer_alone() {
    let buffer = tokens();
    let token = CancellationToken::new();
    token.cancel();

    let outcome = buffer
        .sort(&corpus(), &SortCriteria::default(), &token)
        .unwrap();

    assert_eq!(outcome, SortOutcome::Cancelled);
    let starts: Vec<_> = buffer.matches().iter().map(|m| m.start).collect();
    assert_eq!(starts, [0, 1, 2, 3, 4, 5]);
}

#[test]
fn criteria_deserialize_with_defaults() {
    let criteria: SortCriteria =
        serde_json::from_str(r#"{ "column": "right-context", "atergo": true }"#).unwrap();

    assert_eq!(
        criteria,
        SortCriteria::new(SortColumn::RightContext).atergo(true)
    );
}
