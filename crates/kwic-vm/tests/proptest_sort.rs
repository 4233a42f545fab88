//! Property tests for concordance sorting.

use kwic_core::{CorpusBuilder, MemoryCorpus, Span};
use kwic_vm::{CancellationToken, Match, MatchBuffer, SortColumn, SortCriteria, SortOutcome};
use proptest::prelude::*;

const ORTHS: [&str; 5] = ["a", "ab", "b", "ba", "abc"];

fn arb_corpus_and_matches() -> impl Strategy<Value = (Vec<usize>, Vec<(usize, usize)>)> {
    prop::collection::vec(0..ORTHS.len(), 2..24).prop_flat_map(|tokens| {
        let len = tokens.len();
        let spans = prop::collection::vec(
            (0..len).prop_flat_map(move |start| (Just(start), start + 1..=len.min(start + 3))),
            0..20,
        );
        (Just(tokens), spans)
    })
}

fn arb_criteria() -> impl Strategy<Value = SortCriteria> {
    (
        prop::sample::select(vec![
            SortColumn::LeftContext,
            SortColumn::Match,
            SortColumn::RightContext,
        ]),
        any::<bool>(),
        any::<bool>(),
        0..4usize,
    )
        .prop_map(|(column, ascending, atergo, context)| {
            SortCriteria::new(column)
                .ascending(ascending)
                .atergo(atergo)
                .context(context)
        })
}

fn build(tokens: &[usize]) -> MemoryCorpus {
    let mut builder = CorpusBuilder::new(["orth"]);
    builder.begin_document([("source", "generated")]);
    for &t in tokens {
        builder.push_token(&[ORTHS[t]]).unwrap();
    }
    builder.build().unwrap()
}

/// The key a sort should order by, as plain strings.
fn expected_key(tokens: &[usize], m: &Match, criteria: &SortCriteria) -> Vec<String> {
    let len = tokens.len();
    let (low, high) = match criteria.column {
        SortColumn::LeftContext => (m.start.saturating_sub(criteria.context), m.start),
        SortColumn::RightContext => (m.end, (m.end + criteria.context).min(len)),
        _ => (m.start, m.end),
    };
    let words = tokens[low..high].iter().map(|&t| ORTHS[t]);
    if criteria.atergo {
        words.rev().map(|w| w.chars().rev().collect()).collect()
    } else {
        words.map(str::to_owned).collect()
    }
}

proptest! {
    #[test]
    fn sort_is_ordered_and_stable(
        (tokens, spans) in arb_corpus_and_matches(),
        criteria in arb_criteria(),
    ) {
        let corpus = build(&tokens);
        let buffer = MatchBuffer::new(spans.len());
        // `document` carries the insertion order; sorting never reads it.
        let input: Vec<Match> = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| Match {
                start,
                end,
                focus: start,
                document: i,
                within: Span::new(0, tokens.len()),
            })
            .collect();
        for &m in &input {
            prop_assert!(buffer.push(m).unwrap());
        }

        let outcome = buffer.sort(&corpus, &criteria, &CancellationToken::new()).unwrap();
        prop_assert_eq!(outcome, SortOutcome::Sorted);

        let output = buffer.matches();
        let mut seen: Vec<usize> = output.iter().map(|m| m.document).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..input.len()).collect::<Vec<_>>());

        for pair in output.windows(2) {
            let a = expected_key(&tokens, &pair[0], &criteria);
            let b = expected_key(&tokens, &pair[1], &criteria);
            if a == b {
                prop_assert!(pair[0].document < pair[1].document, "unstable: {pair:?}");
            } else if criteria.ascending {
                prop_assert!(a < b, "{a:?} before {b:?}");
            } else {
                prop_assert!(a > b, "{a:?} before {b:?}");
            }
        }
    }
}
