//! Compiled queries.

use kwic_core::Corpus;

use crate::error::{CompileError, Result};
use crate::expr::{Expr, ExprType, MAX_VARIABLES, SymbolId, SymbolPool, VariableRanges};
use crate::graph::{Dfa, DfaPrinter, Fragment, Nfa, NfaPrinter};
use crate::lower::{self, Within};
use crate::parser;

/// A query compiled against one corpus.
///
/// Value predicates are resolved to symbol sets of that corpus, so a `Query`
/// must only be searched against the corpus it was compiled with.
#[derive(Debug)]
pub struct Query {
    source: String,
    pool: SymbolPool,
    phrase_symbols: Vec<bool>,
    nfa: Nfa,
    root: Fragment,
    dfa: Dfa,
    within: Option<Within>,
    meta: Option<Expr>,
    ranges: VariableRanges,
    has_variables: bool,
}

impl Query {
    pub fn compile<C: Corpus + ?Sized>(source: &str, corpus: &C) -> Result<Self> {
        let ast = parser::parse(source)?;
        let lowered = lower::lower(source, &ast, corpus)?;
        let dfa = Dfa::build(&lowered.nfa, lowered.root)
            .map_err(|e| CompileError::automaton(e, 0..source.len()))?;

        let mut ranges: VariableRanges = [0; MAX_VARIABLES];
        let mut has_variables = false;
        let mut phrase_symbols = Vec::with_capacity(lowered.pool.len());
        for (_, expr) in lowered.pool.iter() {
            expr.variable_ranges(&mut ranges);
            has_variables |= expr.has_variables();
            phrase_symbols.push(expr.expr_type() == ExprType::Phrase);
        }

        tracing::debug!(
            symbols = lowered.pool.len(),
            nfa_nodes = lowered.nfa.len(),
            dfa_states = dfa.len(),
            has_variables,
            "compiled query"
        );

        Ok(Self {
            source: source.to_owned(),
            pool: lowered.pool,
            phrase_symbols,
            nfa: lowered.nfa,
            root: lowered.root,
            dfa,
            within: lowered.within,
            meta: lowered.meta,
            ranges,
            has_variables,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn symbols(&self) -> &SymbolPool {
        &self.pool
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Expr {
        self.pool.get(id)
    }

    /// Whether links labeled `id` consume a whole syntax group.
    #[inline]
    pub fn is_phrase_symbol(&self, id: SymbolId) -> bool {
        self.phrase_symbols[id as usize]
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn root(&self) -> Fragment {
        self.root
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn within(&self) -> Option<&Within> {
        self.within.as_ref()
    }

    pub fn meta(&self) -> Option<&Expr> {
        self.meta.as_ref()
    }

    pub fn variable_ranges(&self) -> &VariableRanges {
        &self.ranges
    }

    pub fn has_variables(&self) -> bool {
        self.has_variables
    }

    /// Symbol table, NFA and DFA, as printed by `kwic dump`.
    pub fn dump(&self) -> String {
        let mut out = NfaPrinter::new(&self.nfa).with_symbols(&self.pool).dump();
        out.push('\n');
        out.push_str(&DfaPrinter::new(&self.dfa).dump());
        out
    }
}
