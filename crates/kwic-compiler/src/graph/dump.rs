//! Dump helpers for automaton inspection and testing.

use std::fmt::Write;

use super::{Dfa, Label, LinkFlags, Nfa};
use crate::expr::SymbolPool;

fn format_label(w: &mut String, label: Label, flags: LinkFlags) -> std::fmt::Result {
    match label {
        Label::Epsilon => w.push('ε'),
        Label::Wildcard => w.push('.'),
        Label::Symbol(id) => write!(w, "#{id}")?,
    }
    if flags.is_focus() {
        w.push('^');
    }
    Ok(())
}

fn format_symbols(w: &mut String, pool: &SymbolPool) -> std::fmt::Result {
    for (id, expr) in pool.iter() {
        writeln!(w, "#{id} = {expr}")?;
    }
    if !pool.is_empty() {
        writeln!(w)?;
    }
    Ok(())
}

/// Printer for [`Nfa`].
///
/// One line per node: `N{id}: {label} → N{target}, ...`, `∅` when the node has
/// no links. A `^` after a label marks a focus link.
pub struct NfaPrinter<'a> {
    nfa: &'a Nfa,
    symbols: Option<&'a SymbolPool>,
}

impl<'a> NfaPrinter<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Self { nfa, symbols: None }
    }

    /// Prefix the dump with the symbol table.
    pub fn with_symbols(mut self, pool: &'a SymbolPool) -> Self {
        self.symbols = Some(pool);
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        if let Some(pool) = self.symbols {
            format_symbols(w, pool)?;
        }

        for (id, node) in self.nfa.iter() {
            write!(w, "N{id}:")?;
            if node.links.is_empty() {
                writeln!(w, " ∅")?;
                continue;
            }
            for (i, link) in node.links.iter().enumerate() {
                w.push_str(if i == 0 { " " } else { ", " });
                format_label(w, link.label, link.flags)?;
                write!(w, " → N{}", link.target)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

/// Printer for [`Dfa`].
///
/// Header per state: `S{id}`, a `*` when final, then `d={distance}` or `d=?`
/// for poisoned states.
pub struct DfaPrinter<'a> {
    dfa: &'a Dfa,
    symbols: Option<&'a SymbolPool>,
    show_closures: bool,
}

impl<'a> DfaPrinter<'a> {
    pub fn new(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            symbols: None,
            show_closures: false,
        }
    }

    pub fn with_symbols(mut self, pool: &'a SymbolPool) -> Self {
        self.symbols = Some(pool);
        self
    }

    /// Append the NFA closure of every state.
    pub fn show_closures(mut self, show: bool) -> Self {
        self.show_closures = show;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        if let Some(pool) = self.symbols {
            format_symbols(w, pool)?;
        }

        for (id, state) in self.dfa.iter() {
            write!(w, "S{id}")?;
            if state.is_final {
                w.push('*');
            }
            match state.distance {
                Some(d) => write!(w, " d={d}:")?,
                None => w.push_str(" d=?:"),
            }
            if state.links.is_empty() {
                w.push_str(" ∅");
            }
            for (i, link) in state.links.iter().enumerate() {
                w.push_str(if i == 0 { " " } else { ", " });
                format_label(w, link.label, link.flags)?;
                write!(w, " → S{}", link.target)?;
            }
            if self.show_closures {
                write!(w, "  {:?}", state.closure)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
