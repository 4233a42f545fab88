//! Syntax tree of a parsed query.
//!
//! Spans are byte ranges into the query source; they are carried on the nodes
//! that lowering can reject (attributes, values, quantifiers, conditions).

use std::ops::Range;

pub type Span = Range<usize>;

/// `pattern ("within" scope)? ("meta" condition)?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAst {
    pub pattern: Alternation,
    pub within: Option<Scope>,
    pub meta: Option<Condition>,
}

/// Branches separated by `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation {
    pub branches: Vec<Sequence>,
    pub span: Span,
}

/// Elements matched one after another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub elements: Vec<Element>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Marked with `^`.
    pub focus: bool,
    pub atom: Atom,
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// `[cond]`, `"str"`; `None` is the wildcard (`[]`, `.`).
    Token(Option<Condition>),
    /// `<cond>`
    Phrase(Condition),
    /// `( pattern )`
    Group(Alternation),
}

/// Repetition bounds; `max: None` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub min: usize,
    pub max: Option<usize>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// `within s`
    Subdocument { kind: String, span: Span },
    /// `within <cond>`
    Phrase(Condition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub kind: ConditionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionKind {
    Bool(bool),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    /// `attr = value` or `attr != value`
    Compare {
        attr: String,
        attr_span: Span,
        negated: bool,
        value: ValueLit,
        value_span: Span,
    },
    /// `synh=[..]`, `semh=[..]`, `head=[..]`, optionally prefixed by `all`.
    Head {
        head: Head,
        all: bool,
        cond: Box<Condition>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Head {
    Syntactic,
    Semantic,
    /// Both heads are the same token.
    Same,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueLit {
    /// Full-match regular expression.
    Regex {
        pattern: String,
        case_insensitive: bool,
    },
    /// Literal value written as a bare identifier or number.
    Literal(String),
    /// `$name`
    Variable(String),
}

impl Condition {
    pub fn new(kind: ConditionKind, span: Span) -> Self {
        Self { kind, span }
    }
}
