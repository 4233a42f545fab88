//! Tests for subset construction and distance assignment.

use super::*;

fn sym(id: u32) -> Label {
    Label::Symbol(id)
}

fn dump(dfa: &Dfa) -> String {
    DfaPrinter::new(dfa).dump()
}

#[test]
fn literal_sequence_is_a_chain() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));
    let root = nfa.concat(a, b, LinkFlags::NONE);

    let dfa = Dfa::build(&nfa, root).unwrap();

    assert_eq!(dfa.len(), 3);
    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1
    S1 d=1: #1 → S2
    S2* d=2: ∅
    ");
}

#[test]
fn union_branches() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));
    let root = nfa.union(a, b);

    let dfa = Dfa::build(&nfa, root).unwrap();

    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1, #1 → S2
    S1* d=1: ∅
    S2* d=1: ∅
    ");
}

#[test]
fn equal_symbols_share_one_link() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(0));
    let root = nfa.union(a, b);

    let dfa = Dfa::build(&nfa, root).unwrap();

    assert_eq!(dfa.len(), 2);
    let start = dfa.state(dfa.start());
    assert_eq!(start.links.len(), 1);
    assert_eq!(
        dfa.state(start.links[0].target)
            .closure
            .iter()
            .collect::<Vec<_>>(),
        vec![1, 3, 5]
    );
}

#[test]
fn wildcard_link_is_last() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(Label::Wildcard);
    let b = nfa.atomic(sym(0));
    let root = nfa.union(a, b);

    let dfa = Dfa::build(&nfa, root).unwrap();

    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1, . → S2
    S1* d=1: ∅
    S2* d=1: ∅
    ");
}

#[test]
fn cycle_poisons_distance() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let root = nfa.quantify(a, 1, None).unwrap();

    let dfa = Dfa::build(&nfa, root).unwrap();

    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1
    S1* d=?: #0 → S1
    ");
}

#[test]
fn second_path_poisons_distance() {
    // (#0 | #1 #2) #3
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));
    let c = nfa.atomic(sym(2));
    let bc = nfa.concat(b, c, LinkFlags::NONE);
    let u = nfa.union(a, bc);
    let d = nfa.atomic(sym(3));
    let root = nfa.concat(u, d, LinkFlags::NONE);

    let dfa = Dfa::build(&nfa, root).unwrap();

    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1, #1 → S2
    S1 d=1: #3 → S3
    S2 d=1: #2 → S4
    S3* d=?: ∅
    S4 d=2: #3 → S3
    ");
}

#[test]
fn epsilon_flags_apply_to_outgoing_links() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let b = nfa.atomic(sym(1));
    let focused = nfa.focus(b);
    let root = nfa.concat(a, focused, LinkFlags::NONE);

    let dfa = Dfa::build(&nfa, root).unwrap();

    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1
    S1 d=1: #1^ → S2
    S2* d=2: ∅
    ");
    assert!(dfa.state(1).links[0].flags.is_focus());
    assert!(!dfa.state(0).links[0].flags.is_focus());
}

#[test]
fn focus_stays_on_its_own_branch() {
    let mut nfa = Nfa::new();
    let det = nfa.atomic(sym(0));
    let adj = nfa.atomic(sym(1));
    let noun = nfa.atomic(sym(2));
    let focused = nfa.focus(noun);
    let branches = nfa.union(adj, focused);
    let root = nfa.concat(det, branches, LinkFlags::NONE);

    let dfa = Dfa::build(&nfa, root).unwrap();

    insta::assert_snapshot!(dump(&dfa), @r"
    S0 d=0: #0 → S1
    S1 d=1: #1 → S2, #2^ → S3
    S2* d=2: ∅
    S3* d=2: ∅
    ");
}

#[test]
fn oversized_nfa_is_rejected() {
    let mut nfa = Nfa::new();
    let mut root = nfa.atomic(sym(0));
    while nfa.len() <= MAX_NODES {
        let next = nfa.atomic(sym(0));
        root = nfa.concat(root, next, LinkFlags::NONE);
    }

    assert_eq!(Dfa::build(&nfa, root).unwrap_err(), BuildError::TooManyNodes);
}

#[test]
fn bounded_repetition_accepts_only_in_range() {
    let mut nfa = Nfa::new();
    let a = nfa.atomic(sym(0));
    let root = nfa.quantify(a, 2, Some(3)).unwrap();

    let dfa = Dfa::build(&nfa, root).unwrap();

    // Walk the single-symbol chain and record finality after each step.
    let mut state = dfa.start();
    let mut finals = vec![dfa.state(state).is_final];
    while let Some(link) = dfa.state(state).links.first() {
        state = link.target;
        finals.push(dfa.state(state).is_final);
    }
    assert_eq!(finals, vec![false, false, true, true]);
}
