//! Orthographic collation ranks for result sorting.

use crate::{Interner, Symbol};

/// Rank of every interned string in plain (`afronte`) and reversed
/// (`atergo`) lexicographic order.
#[derive(Clone, Debug, Default)]
pub struct Collation {
    afronte: Vec<u32>,
    atergo: Vec<u32>,
}

impl Collation {
    pub fn new(interner: &Interner) -> Self {
        let mut order: Vec<(Symbol, &str)> = interner.iter().collect();

        order.sort_by(|a, b| a.1.cmp(b.1));
        let afronte = ranks(&order, interner.len());

        order.sort_by(|a, b| a.1.chars().rev().cmp(b.1.chars().rev()));
        let atergo = ranks(&order, interner.len());

        Self { afronte, atergo }
    }

    #[inline]
    pub fn rank(&self, sym: Symbol, atergo: bool) -> u32 {
        let table = if atergo { &self.atergo } else { &self.afronte };
        table.get(sym.index()).copied().unwrap_or(u32::MAX)
    }
}

fn ranks(order: &[(Symbol, &str)], len: usize) -> Vec<u32> {
    let mut table = vec![0; len];
    for (rank, (sym, _)) in order.iter().enumerate() {
        table[sym.index()] = rank as u32;
    }
    table
}
