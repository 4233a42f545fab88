//! Tests for NFA fragment combinators.

use super::*;

fn sym(id: u32) -> Label {
    Label::Symbol(id)
}

#[test]
fn atomic_fragment() {
    let mut nfa = Nfa::new();

    let frag = nfa.atomic(sym(0));

    assert_eq!(frag, Fragment { start: 0, end: 1 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1
    N1: ∅
    ");
}

#[test]
fn concat_two() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));

    let frag = nfa.concat(a, b, LinkFlags::NONE);

    assert_eq!(frag, Fragment { start: 0, end: 3 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1
    N1: ε → N2
    N2: #1 → N3
    N3: ∅
    ");
}

#[test]
fn union_two() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));

    let frag = nfa.union(a, b);

    assert_eq!(frag, Fragment { start: 4, end: 5 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1
    N1: ε → N5
    N2: #1 → N3
    N3: ε → N5
    N4: ε → N0, ε → N2
    N5: ∅
    ");
}

#[test]
fn focus_prefixes_entry() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(Label::Wildcard);

    let frag = nfa.focus(a);

    assert_eq!(frag, Fragment { start: 2, end: 1 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: . → N1
    N1: ∅
    N2: ε^ → N0
    ");
}

#[test]
fn duplicate_link_merges_flags() {
    let mut nfa = Nfa::new();
    let a = nfa.add_node();
    let b = nfa.add_node();

    nfa.link(a, b, Label::Epsilon, LinkFlags::NONE);
    nfa.link(a, b, Label::Epsilon, LinkFlags::FOCUS);
    nfa.link(a, b, sym(7), LinkFlags::NONE);

    assert_eq!(nfa.node(a).links.len(), 2);
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: ε^ → N1, #7 → N1
    N1: ∅
    ");
}

#[test]
fn copy_preserves_loops() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let plus = nfa.quantify(a, 1, None).unwrap();

    let copy = nfa.copy(plus);

    assert_eq!(copy, Fragment { start: 2, end: 3 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1
    N1: ε → N0
    N2: #0 → N3
    N3: ε → N2
    ");
}

#[test]
fn copy_with_unreachable_end() {
    let mut nfa = Nfa::new();
    let start = nfa.add_node();
    let end = nfa.add_node();

    let copy = nfa.copy(Fragment { start, end });

    assert_eq!(copy, Fragment { start: 2, end: 3 });
    assert_eq!(nfa.len(), 4);
}

#[test]
fn quantify_star() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));

    let frag = nfa.quantify(a, 0, None).unwrap();

    assert_eq!(frag, a);
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1, ε → N1
    N1: ε → N0
    ");
}

#[test]
fn quantify_optional() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));

    nfa.quantify(a, 0, Some(1)).unwrap();

    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1, ε → N1
    N1: ∅
    ");
}

#[test]
fn quantify_at_least_two() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));

    let frag = nfa.quantify(a, 2, None).unwrap();

    assert_eq!(frag, Fragment { start: 0, end: 4 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1
    N1: ε → N2
    N2: #0 → N3
    N3: ε → N4
    N4: #0 → N5
    N5: ε → N4
    ");
}

#[test]
fn quantify_bounded() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));

    let frag = nfa.quantify(a, 2, Some(3)).unwrap();

    assert_eq!(frag, Fragment { start: 6, end: 7 });
    insta::assert_snapshot!(NfaPrinter::new(&nfa).dump(), @r"
    N0: #0 → N1
    N1: ε → N2
    N2: #0 → N3
    N3: ε → N4
    N4: #0 → N5, ε → N7
    N5: ε → N7
    N6: ε → N0
    N7: ∅
    ");
}

#[test]
fn quantify_rejects_bad_ranges() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));

    assert_eq!(
        nfa.quantify(a, 0, Some(0)),
        Err(BuildError::InvalidRange { min: 0, max: 0 })
    );

    let err = nfa.quantify(a, 3, Some(2)).unwrap_err();
    assert_eq!(err, BuildError::InvalidRange { min: 3, max: 2 });
    assert_eq!(err.to_string(), "invalid repetition range {3,2}");
}

#[test]
fn epsilon_closure_follows_only_epsilons() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));
    let u = nfa.union(a, b);

    let closure = nfa.epsilon_closure(u.start);

    assert_eq!(closure.nodes.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
    assert_eq!(closure.nodes.width(), nfa.len());
    assert!(closure.focused.is_empty());
}

#[test]
fn epsilon_closure_marks_nodes_behind_focus_links() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));
    let focused = nfa.focus(b);
    let u = nfa.union(a, focused);

    let closure = nfa.epsilon_closure(u.start);

    assert_eq!(closure.nodes.iter().collect::<Vec<_>>(), vec![0, 2, 4, 5]);
    assert_eq!(closure.focused.iter().collect::<Vec<_>>(), vec![2]);
    assert_eq!(closure.flags(a.start), LinkFlags::NONE);
    assert_eq!(closure.flags(b.start), LinkFlags::FOCUS);
}

#[test]
fn quantify_refuses_to_outgrow_the_node_limit() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let inner = nfa.quantify(a, 0, Some(1000)).unwrap();
    let before = nfa.len();

    assert_eq!(
        nfa.quantify(inner, 0, Some(1000)),
        Err(BuildError::TooManyNodes)
    );
    assert_eq!(nfa.len(), before);
}
