//! Value literals matched against a dictionary.
//!
//! A regex value accepts a symbol iff the whole symbol text matches. The
//! pattern is first parsed on its own so syntax errors point into the query;
//! it is then compiled into an anchored dense DFA and run over every symbol of
//! the domain once, at compile time.

use regex_automata::dfa::{Automaton, StartKind, dense};
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input};

use kwic_core::{BitSet, Interner, Symbol};

use crate::error::{CompileError, Result};
use crate::parser::ast::{Span, ValueLit};

/// Symbols of `dictionary` accepted by `value`, as a set over interner indices.
///
/// `value_span` covers the value as written, quotes included.
pub fn match_dictionary(
    interner: &Interner,
    dictionary: &[Symbol],
    value: &ValueLit,
    value_span: &Span,
) -> Result<BitSet> {
    let mut matches = BitSet::new(interner.len());
    match value {
        ValueLit::Literal(text) => {
            if let Some(sym) = interner.get(text)
                && dictionary.contains(&sym)
            {
                matches.insert(sym.index());
            }
        }
        ValueLit::Regex {
            pattern,
            case_insensitive,
        } => {
            let dfa = compile(pattern, *case_insensitive, value_span)?;
            for &sym in dictionary {
                let input = Input::new(interner.resolve(sym)).anchored(Anchored::Yes);
                if matches!(dfa.try_search_fwd(&input), Ok(Some(_))) {
                    matches.insert(sym.index());
                }
            }
        }
        ValueLit::Variable(_) => {}
    }
    Ok(matches)
}

fn compile(
    pattern: &str,
    case_insensitive: bool,
    value_span: &Span,
) -> Result<dense::DFA<Vec<u32>>> {
    // Pattern text starts after the opening quote.
    let offset = value_span.start + 1;
    if let Err(e) = regex_syntax::ast::parse::ParserBuilder::new()
        .build()
        .parse(pattern)
    {
        let span = e.span();
        let start = (offset + span.start.offset).min(value_span.end);
        let end = (offset + span.end.offset).clamp(start, value_span.end);
        return Err(CompileError::InvalidRegex {
            message: e.kind().to_string(),
            span: start..end,
        });
    }

    dense::Builder::new()
        .syntax(syntax::Config::new().case_insensitive(case_insensitive))
        .configure(dense::Config::new().start_kind(StartKind::Anchored))
        .build(&format!("(?:{pattern})$"))
        .map_err(|e| CompileError::InvalidRegex {
            message: e.to_string(),
            span: value_span.clone(),
        })
}
