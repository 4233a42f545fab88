use rand::SeedableRng;
use rand::rngs::StdRng;

use kwic_core::{CorpusBuilder, Span};

use super::{Match, MatchBuffer, MatchBufferInfo, Offer, match_for_document};

fn at(start: usize) -> Match {
    Match {
        start,
        end: start + 1,
        focus: start,
        document: 0,
        within: Span::new(0, 100),
    }
}

fn append(buffer: &MatchBuffer, m: Match) -> Offer {
    buffer.offer::<StdRng>(m, None).unwrap()
}

fn starts(buffer: &MatchBuffer) -> Vec<usize> {
    buffer.matches().iter().map(|m| m.start).collect()
}

#[test]
fn appends_until_full() {
    let buffer = MatchBuffer::new(2);

    assert!(matches!(append(&buffer, at(0)), Offer::Counted(_)));
    let Offer::Counted(info) = append(&buffer, at(1)) else {
        panic!("second match should fit");
    };
    assert_eq!(
        info,
        MatchBufferInfo {
            capacity: 2,
            used: 2,
            num_results: 2
        }
    );
    assert!(matches!(append(&buffer, at(2)), Offer::Full));

    assert_eq!(starts(&buffer), [0, 1]);
    assert_eq!(buffer.info().num_results, 2);
    assert_eq!(buffer.get(1), Some(at(1)));
    assert_eq!(buffer.get(2), None);
}

#[test]
fn forget_empties_and_resets_counter() {
    let buffer = MatchBuffer::new(4);
    append(&buffer, at(0));
    append(&buffer, at(1));

    buffer.forget();

    assert!(buffer.is_empty());
    assert_eq!(buffer.info(), MatchBufferInfo {
        capacity: 4,
        used: 0,
        num_results: 0
    });
}

#[test]
fn shrinking_keeps_newest() {
    let buffer = MatchBuffer::new(4);
    for start in 0..4 {
        append(&buffer, at(start));
    }

    buffer.resize(2);
    assert_eq!(starts(&buffer), [2, 3]);
    assert_eq!(buffer.capacity(), 2);

    buffer.resize(3);
    assert!(matches!(append(&buffer, at(9)), Offer::Counted(_)));
    assert_eq!(starts(&buffer), [2, 3, 9]);
}

#[test]
fn zero_capacity_is_always_full() {
    let buffer = MatchBuffer::new(0);

    assert!(matches!(append(&buffer, at(0)), Offer::Full));
    assert_eq!(buffer.len(), 0);
}

#[test]
fn sampling_counts_everything_and_keeps_capacity() {
    let buffer = MatchBuffer::new(3);
    let mut rng = StdRng::seed_from_u64(11);

    for start in 0..10 {
        let offer = buffer.offer(at(start), Some(&mut rng)).unwrap();
        assert!(matches!(offer, Offer::Counted(_)));
    }

    let info = buffer.info();
    assert_eq!(info.used, 3);
    assert_eq!(info.num_results, 10);

    let mut kept = starts(&buffer);
    kept.sort_unstable();
    kept.dedup();
    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|&s| s < 10));
}

#[test]
fn sampling_below_capacity_keeps_everything() {
    let buffer = MatchBuffer::new(8);
    let mut rng = StdRng::seed_from_u64(3);

    for start in 0..5 {
        buffer.offer(at(start), Some(&mut rng)).unwrap();
    }

    let mut kept = starts(&buffer);
    kept.sort_unstable();
    assert_eq!(kept, [0, 1, 2, 3, 4]);
}

#[test]
fn document_as_match() {
    let mut builder = CorpusBuilder::new(["orth"]);
    builder.begin_document([("id", "1")]);
    builder.push_token(&["a"]).unwrap();
    builder.push_token(&["b"]).unwrap();
    builder.begin_document([("id", "2")]);
    builder.push_token(&["c"]).unwrap();
    let corpus = builder.build().unwrap();

    assert_eq!(
        match_for_document(&corpus, 1),
        Some(Match {
            start: 2,
            end: 3,
            focus: 2,
            document: 1,
            within: Span::new(2, 3),
        })
    );
    assert_eq!(match_for_document(&corpus, 2), None);
}
