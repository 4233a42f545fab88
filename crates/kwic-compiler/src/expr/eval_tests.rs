use kwic_core::{BitSet, Corpus, CorpusBuilder, GroupKind, MemoryCorpus};

use super::*;

fn corpus() -> MemoryCorpus {
    let mut builder = CorpusBuilder::new(["orth", "pos"]);
    builder.begin_document([("genre", "fable")]);
    for (orth, pos) in [
        ("dogs", "noun"),
        ("and", "conj"),
        ("cats", "noun"),
        ("sleep", "verb"),
    ] {
        builder.push_token(&[orth, pos]).unwrap();
    }
    builder.group(0, 2, "NP", GroupKind::Coordination { members: 3 });
    builder.group(0, 0, "NP", GroupKind::Simple { synh: Some(0), semh: Some(0) });
    builder.group(1, 1, "conj", GroupKind::Conjunction);
    builder.group(2, 2, "NP", GroupKind::Simple { synh: Some(2), semh: None });
    builder.group(3, 3, "VP", GroupKind::Simple { synh: Some(3), semh: Some(3) });
    builder.build().unwrap()
}

fn value(corpus: &MemoryCorpus, domain: Domain, names: &[&str]) -> Expr {
    let mut matches = BitSet::new(corpus.interner().len());
    for name in names {
        matches.insert(corpus.interner().get(name).unwrap().index());
    }
    Expr::value(Value::new(domain, matches, names.join("|")))
}

fn pos(corpus: &MemoryCorpus, names: &[&str]) -> Expr {
    value(corpus, Domain::Token(corpus.attribute("pos").unwrap()), names)
}

#[test]
fn token_values_and_negation() {
    let corpus = corpus();
    let noun = pos(&corpus, &["noun"]);
    let bindings = Bindings::default();
    let seg = |i| corpus.segment(i).unwrap();

    assert!(noun.eval(&seg(0), &bindings));
    assert!(!noun.eval(&seg(1), &bindings));
    assert!(noun.clone().not().eval(&seg(1), &bindings));

    let either = Expr::or(noun, pos(&corpus, &["verb"])).unwrap();
    assert!(either.eval(&seg(3), &bindings));
    assert!(!either.clone().not().eval(&seg(3), &bindings));
}

#[test]
fn variables_follow_bindings() {
    let corpus = corpus();
    let var = Expr::variable(0, vec![pos(&corpus, &["noun"]), pos(&corpus, &["verb"])]);
    let mut ranges = [0; MAX_VARIABLES];
    var.variable_ranges(&mut ranges);

    let mut bindings = Bindings::first(&ranges);
    assert_eq!(bindings.get(0), 1);
    assert!(var.eval(&corpus.segment(3).unwrap(), &bindings));

    assert!(bindings.advance(&ranges));
    assert_eq!(bindings.get(0), 0);
    assert!(var.eval(&corpus.segment(0).unwrap(), &bindings));

    assert!(!bindings.advance(&ranges));
    assert_eq!(bindings, Bindings::first(&ranges));
}

#[test]
fn bindings_count_as_mixed_radix() {
    let mut ranges = [0; MAX_VARIABLES];
    ranges[0] = 2;
    ranges[1] = 3;

    let mut bindings = Bindings::first(&ranges);
    let mut seen = vec![(bindings.get(0), bindings.get(1))];
    while bindings.advance(&ranges) {
        seen.push((bindings.get(0), bindings.get(1)));
    }

    assert_eq!(
        seen,
        vec![(1, 2), (0, 2), (1, 1), (0, 1), (1, 0), (0, 0)]
    );
}

#[test]
fn group_type_values() {
    let corpus = corpus();
    let np = value(&corpus, Domain::GroupType, &["NP"]);

    assert!(np.eval_group(&corpus, 0));
    assert!(!np.eval_group(&corpus, 4));
    assert!(np.clone().not().eval_group(&corpus, 4));
}

#[test]
fn head_constraints_on_simple_groups() {
    let corpus = corpus();
    let noun_head = Expr::phrase(Some(pos(&corpus, &["noun"])), None, false, false);
    let same_head = Expr::phrase(Some(pos(&corpus, &["noun"])), None, true, false);
    let noun_semh = Expr::phrase(None, Some(pos(&corpus, &["noun"])), false, false);

    assert!(noun_head.eval_group(&corpus, 1));
    assert!(!noun_head.eval_group(&corpus, 4));
    assert!(same_head.eval_group(&corpus, 1));
    // synh 2 differs from the unknown semantic head
    assert!(!same_head.eval_group(&corpus, 3));
    // unknown semantic head never satisfies a constraint
    assert!(!noun_semh.eval_group(&corpus, 3));
}

#[test]
fn coordination_scans_members() {
    let corpus = corpus();
    let dogs = value(
        &corpus,
        Domain::Token(kwic_core::ORTH),
        &["dogs"],
    );
    let any = Expr::phrase(Some(dogs.clone()), None, false, false);
    let all = Expr::phrase(Some(dogs), None, false, true);
    let nouns = Expr::phrase(Some(pos(&corpus, &["noun"])), None, false, true);

    assert!(any.eval_group(&corpus, 0));
    assert!(!all.eval_group(&corpus, 0));
    assert!(nouns.eval_group(&corpus, 0));
    assert!(!any.not().eval_group(&corpus, 0));
}

#[test]
fn document_filters() {
    let corpus = corpus();
    let genre = corpus.interner().get("genre").unwrap();
    let fable = value(&corpus, Domain::Meta(genre), &["fable"]);
    let doc = &corpus.documents()[0];

    assert!(fable.eval_document(doc));
    assert!(!fable.clone().not().eval_document(doc));

    let missing = corpus.interner().get("noun").unwrap();
    let absent = value(&corpus, Domain::Meta(missing), &["fable"]);
    assert!(!absent.eval_document(doc));
}
