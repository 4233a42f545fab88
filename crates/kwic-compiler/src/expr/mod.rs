//! Predicate expression trees.
//!
//! An [`Expr`] is a boolean predicate over one corpus position, one syntax
//! group or one document, depending on its [`ExprType`]. Negation is a flag on
//! each node, so [`Expr::not`] never allocates. Constructors fold constants and
//! reject combinations of different predicate types.

mod eval;
mod pool;

#[cfg(test)]
mod eval_tests;

use std::cmp::Ordering;
use std::fmt;

use kwic_core::{AttrId, BitSet, Symbol};

pub use eval::{Bindings, MAX_VARIABLES, VariableRanges};
pub use pool::{SymbolId, SymbolPool};

/// What a [`Value`] is tested against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    /// A positional attribute of the current token.
    Token(AttrId),
    /// The type of a syntax group.
    GroupType,
    /// A document metadata field.
    Meta(Symbol),
}

/// Leaf predicate: the set of symbols accepted in `domain`.
///
/// `label` is the source text the value was written as; it is kept for dumps
/// and ignored by comparisons.
#[derive(Clone, Debug)]
pub struct Value {
    pub domain: Domain,
    pub matches: BitSet,
    pub label: String,
}

impl Value {
    pub fn new(domain: Domain, matches: BitSet, label: impl Into<String>) -> Self {
        Self {
            domain,
            matches,
            label: label.into(),
        }
    }

    #[inline]
    pub fn accepts(&self, sym: Symbol) -> bool {
        self.matches.contains(sym.index())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.domain
            .cmp(&other.domain)
            .then_with(|| self.matches.cmp(&other.matches))
    }
}

/// Predicate type of an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprType {
    Constant,
    Token,
    Phrase,
    Document,
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExprType::Constant => "constant",
            ExprType::Token => "token",
            ExprType::Phrase => "phrase",
            ExprType::Document => "document",
        })
    }
}

/// AND/OR of two expressions with different predicate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot combine {left} and {right} conditions")]
pub struct TypeMismatch {
    pub left: ExprType,
    pub right: ExprType,
}

/// Predicate expression.
///
/// The derived ordering is structural: variant first, then the negate flag,
/// then payload and children in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expr {
    And {
        negate: bool,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        negate: bool,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Value {
        negate: bool,
        value: Value,
    },
    Constant(bool),
    /// Head constraints on a syntax group. Absent heads are unconstrained.
    Phrase {
        negate: bool,
        same: bool,
        all: bool,
        synh: Option<Box<Expr>>,
        semh: Option<Box<Expr>>,
    },
    /// Selects `alternatives[bindings[id]]`.
    Variable { id: usize, alternatives: Vec<Expr> },
}

impl Expr {
    pub fn value(value: Value) -> Self {
        Expr::Value {
            negate: false,
            value,
        }
    }

    pub fn phrase(synh: Option<Expr>, semh: Option<Expr>, same: bool, all: bool) -> Self {
        Expr::Phrase {
            negate: false,
            same,
            all,
            synh: synh.map(Box::new),
            semh: semh.map(Box::new),
        }
    }

    /// # Panics
    /// Panics if `alternatives` is empty.
    pub fn variable(id: usize, alternatives: Vec<Expr>) -> Self {
        assert!(!alternatives.is_empty(), "variable without alternatives");
        Expr::Variable { id, alternatives }
    }

    pub fn and(left: Expr, right: Expr) -> Result<Expr, TypeMismatch> {
        match (left, right) {
            (Expr::Constant(false), _) | (_, Expr::Constant(false)) => Ok(Expr::Constant(false)),
            (Expr::Constant(true), x) | (x, Expr::Constant(true)) => Ok(x),
            (left, right) => {
                check_types(&left, &right)?;
                Ok(Expr::And {
                    negate: false,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
        }
    }

    pub fn or(left: Expr, right: Expr) -> Result<Expr, TypeMismatch> {
        match (left, right) {
            (Expr::Constant(true), _) | (_, Expr::Constant(true)) => Ok(Expr::Constant(true)),
            (Expr::Constant(false), x) | (x, Expr::Constant(false)) => Ok(x),
            (left, right) => {
                check_types(&left, &right)?;
                Ok(Expr::Or {
                    negate: false,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
        }
    }

    /// Logical negation in O(1) for everything but variables, whose
    /// alternatives are negated one by one.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate_in_place();
        self
    }

    fn negate_in_place(&mut self) {
        match self {
            Expr::And { negate, .. }
            | Expr::Or { negate, .. }
            | Expr::Value { negate, .. }
            | Expr::Phrase { negate, .. } => *negate ^= true,
            Expr::Constant(c) => *c ^= true,
            Expr::Variable { alternatives, .. } => {
                for alt in alternatives {
                    alt.negate_in_place();
                }
            }
        }
    }

    pub fn expr_type(&self) -> ExprType {
        match self {
            Expr::Constant(_) => ExprType::Constant,
            Expr::Phrase { .. } => ExprType::Phrase,
            Expr::Value { value, .. } => match value.domain {
                Domain::Token(_) => ExprType::Token,
                Domain::GroupType => ExprType::Phrase,
                Domain::Meta(_) => ExprType::Document,
            },
            Expr::And { left, right, .. } | Expr::Or { left, right, .. } => {
                match (left.expr_type(), right.expr_type()) {
                    (ExprType::Constant, t) | (t, ExprType::Constant) => t,
                    (t, _) => t,
                }
            }
            Expr::Variable { alternatives, .. } => alternatives[0].expr_type(),
        }
    }

    pub fn is_constant(&self) -> Option<bool> {
        match self {
            Expr::Constant(c) => Some(*c),
            _ => None,
        }
    }

    pub fn has_variables(&self) -> bool {
        match self {
            Expr::Variable { .. } => true,
            Expr::And { left, right, .. } | Expr::Or { left, right, .. } => {
                left.has_variables() || right.has_variables()
            }
            _ => false,
        }
    }
}

fn check_types(left: &Expr, right: &Expr) -> Result<(), TypeMismatch> {
    let (l, r) = (left.expr_type(), right.expr_type());
    if l == r || l == ExprType::Constant || r == ExprType::Constant {
        Ok(())
    } else {
        Err(TypeMismatch { left: l, right: r })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Value { negate, value } => {
                if *negate {
                    f.write_str("!")?;
                }
                f.write_str(&value.label)
            }
            Expr::And {
                negate,
                left,
                right,
            } => write!(f, "{}({left} & {right})", if *negate { "!" } else { "" }),
            Expr::Or {
                negate,
                left,
                right,
            } => write!(f, "{}({left} | {right})", if *negate { "!" } else { "" }),
            Expr::Phrase {
                negate,
                same,
                all,
                synh,
                semh,
            } => {
                if *negate {
                    f.write_str("!")?;
                }
                if *all {
                    f.write_str("all ")?;
                }
                f.write_str("phrase(")?;
                let mut sep = "";
                if let Some(synh) = synh {
                    write!(f, "{}={synh}", if *same { "head" } else { "synh" })?;
                    sep = ", ";
                }
                if let Some(semh) = semh {
                    write!(f, "{sep}semh={semh}")?;
                }
                f.write_str(")")
            }
            Expr::Variable { id, alternatives } => {
                write!(f, "${id}[{}]", alternatives.len())
            }
        }
    }
}
