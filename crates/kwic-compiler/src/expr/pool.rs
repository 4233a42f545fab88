use std::collections::BTreeMap;

use super::Expr;

/// Index of a link symbol in a [`SymbolPool`].
pub type SymbolId = u32;

/// Deduplicated link symbols of one query.
///
/// Structurally equal expressions share one id, so automaton links can be
/// keyed by id instead of by expression.
#[derive(Debug, Default, Clone)]
pub struct SymbolPool {
    symbols: Vec<Expr>,
    lookup: BTreeMap<Expr, SymbolId>,
}

impl SymbolPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, expr: Expr) -> SymbolId {
        if let Some(&id) = self.lookup.get(&expr) {
            return id;
        }
        let id = self.symbols.len() as SymbolId;
        self.symbols.push(expr.clone());
        self.lookup.insert(expr, id);
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> &Expr {
        &self.symbols[id as usize]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Expr)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, e)| (i as SymbolId, e))
    }
}
