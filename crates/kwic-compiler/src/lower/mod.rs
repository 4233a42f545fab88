//! Lowering of the syntax tree against a corpus.
//!
//! Conditions become [`Expr`] trees whose values are resolved to symbol sets
//! of the corpus dictionaries; the pattern becomes an NFA whose links refer to
//! pooled expressions. Every predicate-type rule of the query language is
//! enforced here.

mod regex;


use std::collections::HashMap;

use kwic_core::{AttrId, BitSet, Corpus, Symbol};

use crate::error::{CompileError, Result};
use crate::expr::{Domain, Expr, ExprType, MAX_VARIABLES, SymbolPool, Value};
use crate::graph::{Fragment, Label, LinkFlags, Nfa};
use crate::parser::ast::{
    Alternation, Atom, Condition, ConditionKind, Element, Head, QueryAst, Scope, Sequence, Span,
    ValueLit,
};

pub use self::regex::match_dictionary;

/// Largest repetition bound accepted in `{n,m}`.
pub const MAX_REPEAT: usize = 1000;

/// Restriction of matches to a region of the corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Within {
    /// Sub-documents of a kind, e.g. sentences.
    Subdocument(String),
    /// Syntax groups satisfying a phrase expression.
    Phrase(Expr),
}

/// Everything lowering produces for one query.
#[derive(Debug)]
pub struct Lowered {
    pub pool: SymbolPool,
    pub nfa: Nfa,
    pub root: Fragment,
    pub within: Option<Within>,
    pub meta: Option<Expr>,
}

/// Where a condition is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Context {
    /// `[...]`
    Token,
    /// `synh=[...]` and friends; like `Token` but without variables.
    Head,
    /// `<...>`
    Phrase,
    /// `meta ...`
    Document,
}

pub fn lower<C: Corpus + ?Sized>(source: &str, ast: &QueryAst, corpus: &C) -> Result<Lowered> {
    let mut lowerer = Lowerer {
        source,
        corpus,
        pool: SymbolPool::new(),
        nfa: Nfa::new(),
        variables: HashMap::new(),
    };

    let default_focus = !has_focus(&ast.pattern);
    let root = lowerer.alternation(&ast.pattern, default_focus)?;

    let within = match &ast.within {
        None => None,
        Some(Scope::Subdocument { kind, span }) => {
            if corpus.subdocuments(kind).is_none() {
                return Err(CompileError::UnknownSubdocument {
                    name: kind.clone(),
                    span: span.clone(),
                });
            }
            Some(Within::Subdocument(kind.clone()))
        }
        Some(Scope::Phrase(cond)) => {
            let expr = lowerer.condition(cond, Context::Phrase)?;
            Some(Within::Phrase(phrase_expr(expr, cond)?))
        }
    };

    let meta = match &ast.meta {
        None => None,
        Some(cond) => {
            let expr = lowerer.condition(cond, Context::Document)?;
            expect_type(&expr, ExprType::Document, cond)?;
            Some(expr)
        }
    };

    Ok(Lowered {
        pool: lowerer.pool,
        nfa: lowerer.nfa,
        root,
        within,
        meta,
    })
}

struct Lowerer<'a, C: ?Sized> {
    source: &'a str,
    corpus: &'a C,
    pool: SymbolPool,
    nfa: Nfa,
    /// Variable name to (id, attribute).
    variables: HashMap<String, (usize, AttrId)>,
}

impl<C: Corpus + ?Sized> Lowerer<'_, C> {
    // ─────────────────────────────────────────────────────────────────────
    // Pattern
    // ─────────────────────────────────────────────────────────────────────

    fn alternation(&mut self, alt: &Alternation, default_focus: bool) -> Result<Fragment> {
        let mut result: Option<Fragment> = None;
        for branch in &alt.branches {
            let frag = self.sequence(branch, default_focus)?;
            result = Some(match result {
                None => frag,
                Some(acc) => self.nfa.union(acc, frag),
            });
        }
        result.ok_or_else(|| CompileError::EmptyPattern {
            span: alt.span.clone(),
        })
    }

    fn sequence(&mut self, seq: &Sequence, default_focus: bool) -> Result<Fragment> {
        let count = seq.elements.len();
        let mut result: Option<Fragment> = None;
        for (i, element) in seq.elements.iter().enumerate() {
            let mut frag = self.element(element)?;
            if element.focus || (default_focus && count >= 2 && i == count - 1) {
                frag = self.nfa.focus(frag);
            }
            result = Some(match result {
                None => frag,
                Some(acc) => self.nfa.concat(acc, frag, LinkFlags::NONE),
            });
        }
        result.ok_or_else(|| CompileError::EmptyPattern {
            span: seq.span.clone(),
        })
    }

    fn element(&mut self, element: &Element) -> Result<Fragment> {
        let frag = match &element.atom {
            Atom::Token(None) => self.nfa.atomic(Label::Wildcard),
            Atom::Token(Some(cond)) => {
                let expr = self.condition(cond, Context::Token)?;
                expect_type(&expr, ExprType::Token, cond)?;
                match expr {
                    Expr::Constant(true) => self.nfa.atomic(Label::Wildcard),
                    expr => self.symbol(expr),
                }
            }
            Atom::Phrase(cond) => {
                let expr = self.condition(cond, Context::Phrase)?;
                let expr = phrase_expr(expr, cond)?;
                self.symbol(expr)
            }
            Atom::Group(alt) => self.alternation(alt, false)?,
        };

        let Some(q) = &element.quantifier else {
            return Ok(frag);
        };
        let bound = q.max.unwrap_or(q.min).max(q.min);
        if bound > MAX_REPEAT {
            return Err(CompileError::RepetitionTooLarge {
                bound,
                span: q.span.clone(),
            });
        }
        self.nfa
            .quantify(frag, q.min, q.max)
            .map_err(|e| CompileError::automaton(e, q.span.clone()))
    }

    fn symbol(&mut self, expr: Expr) -> Fragment {
        let id = self.pool.intern(expr);
        self.nfa.atomic(Label::Symbol(id))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Conditions
    // ─────────────────────────────────────────────────────────────────────

    fn condition(&mut self, cond: &Condition, ctx: Context) -> Result<Expr> {
        match &cond.kind {
            ConditionKind::Bool(b) => Ok(Expr::Constant(*b)),
            ConditionKind::Not(inner) => Ok(self.condition(inner, ctx)?.not()),
            ConditionKind::And(l, r) => {
                let (l, r) = (self.condition(l, ctx)?, self.condition(r, ctx)?);
                Expr::and(l, r).map_err(|e| mixed(e.left, e.right, cond))
            }
            ConditionKind::Or(l, r) => {
                let (l, r) = (self.condition(l, ctx)?, self.condition(r, ctx)?);
                Expr::or(l, r).map_err(|e| mixed(e.left, e.right, cond))
            }
            ConditionKind::Compare {
                attr,
                attr_span,
                negated,
                value,
                value_span,
            } => {
                let expr = self.compare(ctx, attr, attr_span, value, value_span)?;
                Ok(if *negated { expr.not() } else { expr })
            }
            ConditionKind::Head { head, all, cond: inner } => {
                if ctx != Context::Phrase {
                    return Err(CompileError::MisplacedHead {
                        span: cond.span.clone(),
                    });
                }
                let expr = self.condition(inner, Context::Head)?;
                expect_type(&expr, ExprType::Token, inner)?;
                Ok(match head {
                    Head::Syntactic => Expr::phrase(Some(expr), None, false, *all),
                    Head::Semantic => Expr::phrase(None, Some(expr), false, *all),
                    Head::Same => Expr::phrase(Some(expr), None, true, *all),
                })
            }
        }
    }

    fn compare(
        &mut self,
        ctx: Context,
        attr: &str,
        attr_span: &Span,
        value: &ValueLit,
        value_span: &Span,
    ) -> Result<Expr> {
        let corpus = self.corpus;
        let label = format!("{attr}={}", &self.source[value_span.clone()]);

        let (domain, dictionary) = match ctx {
            Context::Document => {
                let key = corpus
                    .interner()
                    .get(attr)
                    .filter(|&key| !corpus.meta_values(key).is_empty())
                    .ok_or_else(|| CompileError::UnknownMetaField {
                        name: attr.to_owned(),
                        span: attr_span.clone(),
                    })?;
                (Domain::Meta(key), corpus.meta_values(key))
            }
            Context::Phrase if attr == "type" => (Domain::GroupType, corpus.group_types()),
            Context::Token | Context::Head | Context::Phrase => {
                let id = self.attribute(attr, attr_span)?;
                (Domain::Token(id), corpus.dictionary(id))
            }
        };

        if let ValueLit::Variable(name) = value {
            let Domain::Token(attr_id) = domain else {
                return Err(CompileError::MisplacedVariable {
                    span: value_span.clone(),
                });
            };
            if ctx != Context::Token {
                return Err(CompileError::MisplacedVariable {
                    span: value_span.clone(),
                });
            }
            return self.variable(name, attr_id, dictionary, value_span);
        }

        let matches = match_dictionary(corpus.interner(), dictionary, value, value_span)?;
        Ok(Expr::value(Value::new(domain, matches, label)))
    }

    fn attribute(&self, name: &str, span: &Span) -> Result<AttrId> {
        self.corpus
            .attribute(name)
            .ok_or_else(|| CompileError::UnknownAttribute {
                name: name.to_owned(),
                span: span.clone(),
            })
    }

    /// One singleton value per dictionary entry; the binding vector selects
    /// which one is active.
    fn variable(
        &mut self,
        name: &str,
        attr: AttrId,
        dictionary: &[Symbol],
        span: &Span,
    ) -> Result<Expr> {
        let id = match self.variables.get(name) {
            Some(&(id, bound)) if bound == attr => id,
            Some(&(_, bound)) => {
                return Err(CompileError::VariableConflict {
                    name: name.to_owned(),
                    attr: self.corpus.attribute_name(bound).to_owned(),
                    span: span.clone(),
                });
            }
            None => {
                let id = self.variables.len();
                if id >= MAX_VARIABLES {
                    return Err(CompileError::TooManyVariables { span: span.clone() });
                }
                self.variables.insert(name.to_owned(), (id, attr));
                id
            }
        };

        if dictionary.is_empty() {
            return Ok(Expr::Constant(false));
        }

        let interner = self.corpus.interner();
        let attr_name = self.corpus.attribute_name(attr);
        let alternatives = dictionary
            .iter()
            .map(|&sym| {
                let mut matches = BitSet::new(interner.len());
                matches.insert(sym.index());
                let label = format!("{attr_name}={}", interner.resolve(sym));
                Expr::value(Value::new(Domain::Token(attr), matches, label))
            })
            .collect();
        Ok(Expr::variable(id, alternatives))
    }
}

/// A `<...>` condition as a link expression. Constant conditions become an
/// unconstrained phrase so the link still consumes a whole group.
fn phrase_expr(expr: Expr, cond: &Condition) -> Result<Expr> {
    expect_type(&expr, ExprType::Phrase, cond)?;
    Ok(match expr {
        Expr::Constant(true) => Expr::phrase(None, None, false, false),
        Expr::Constant(false) => Expr::phrase(None, None, false, false).not(),
        expr => expr,
    })
}

fn expect_type(expr: &Expr, expected: ExprType, cond: &Condition) -> Result<()> {
    let found = expr.expr_type();
    if found == expected || found == ExprType::Constant {
        return Ok(());
    }
    Err(CompileError::WrongConditionType {
        expected,
        found,
        span: cond.span.clone(),
    })
}

fn mixed(left: ExprType, right: ExprType, cond: &Condition) -> CompileError {
    CompileError::MixedTypes {
        left,
        right,
        span: cond.span.clone(),
    }
}

fn has_focus(alt: &Alternation) -> bool {
    alt.branches.iter().any(|seq| {
        seq.elements.iter().any(|el| {
            el.focus
                || match &el.atom {
                    Atom::Group(inner) => has_focus(inner),
                    _ => false,
                }
        })
    })
}
