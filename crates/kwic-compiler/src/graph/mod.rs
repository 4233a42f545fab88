//! Automata built from a query pattern.
//!
//! # Architecture
//!
//! ```text
//! pattern (lower) → Nfa fragments → Dfa::build (subset construction)
//! ```
//!
//! Both automata are arenas indexed by integer ids. Link symbols refer to
//! expressions in the query's [`SymbolPool`](crate::expr::SymbolPool).

mod dfa;
mod dump;
mod nfa;

#[cfg(test)]
mod dfa_tests;
#[cfg(test)]
mod nfa_tests;

pub use dfa::{Dfa, DfaLink, DfaState, MAX_STATES, StateId};
pub use dump::{DfaPrinter, NfaPrinter};
pub use nfa::{
    BuildError, Closure, Fragment, Label, Link, LinkFlags, MAX_NODES, Nfa, Node, NodeId,
};
