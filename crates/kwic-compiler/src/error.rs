use std::ops::Range;

use crate::expr::{ExprType, MAX_VARIABLES};
use crate::graph::BuildError;
use crate::lower::MAX_REPEAT;

/// Errors that make a query unusable.
///
/// Every variant carries the byte span of the offending query text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: &'static str,
        expected: &'static str,
        span: Range<usize>,
    },

    #[error("unexpected end of query, expected {expected}")]
    UnexpectedEnd {
        expected: &'static str,
        span: Range<usize>,
    },

    #[error("unterminated string literal")]
    UnterminatedString { span: Range<usize> },

    #[error("number `{text}` is too large")]
    NumberTooLarge { text: String, span: Range<usize> },

    #[error("empty pattern")]
    EmptyPattern { span: Range<usize> },

    #[error("unknown attribute `{name}`")]
    UnknownAttribute { name: String, span: Range<usize> },

    #[error("unknown metadata field `{name}`")]
    UnknownMetaField { name: String, span: Range<usize> },

    #[error("unknown sub-document kind `{name}`")]
    UnknownSubdocument { name: String, span: Range<usize> },

    #[error("invalid regular expression: {message}")]
    InvalidRegex { message: String, span: Range<usize> },

    #[error("cannot combine {left} and {right} conditions")]
    MixedTypes {
        left: ExprType,
        right: ExprType,
        span: Range<usize>,
    },

    #[error("expected a {expected} condition, found a {found} condition")]
    WrongConditionType {
        expected: ExprType,
        found: ExprType,
        span: Range<usize>,
    },

    #[error("at most {} variables are allowed", MAX_VARIABLES)]
    TooManyVariables { span: Range<usize> },

    #[error("variable `${name}` is already bound to attribute `{attr}`")]
    VariableConflict {
        name: String,
        attr: String,
        span: Range<usize>,
    },

    #[error("variables are only allowed in token conditions")]
    MisplacedVariable { span: Range<usize> },

    #[error("head constraints are only allowed inside `<...>`")]
    MisplacedHead { span: Range<usize> },

    #[error("`all` applies only to head constraints")]
    MisplacedAll { span: Range<usize> },

    #[error("invalid repetition range {{{min},{max}}}")]
    InvalidQuantifier {
        min: usize,
        max: usize,
        span: Range<usize>,
    },

    #[error("repetition bound {bound} exceeds the maximum of {}", MAX_REPEAT)]
    RepetitionTooLarge { bound: usize, span: Range<usize> },

    #[error("pattern is too large: {reason}")]
    PatternTooLarge {
        reason: BuildError,
        span: Range<usize>,
    },

    #[error("out of memory while compiling the pattern")]
    OutOfMemory { span: Range<usize> },
}

impl CompileError {
    pub fn span(&self) -> Range<usize> {
        match self {
            CompileError::UnexpectedToken { span, .. }
            | CompileError::UnexpectedEnd { span, .. }
            | CompileError::UnterminatedString { span }
            | CompileError::NumberTooLarge { span, .. }
            | CompileError::EmptyPattern { span }
            | CompileError::UnknownAttribute { span, .. }
            | CompileError::UnknownMetaField { span, .. }
            | CompileError::UnknownSubdocument { span, .. }
            | CompileError::InvalidRegex { span, .. }
            | CompileError::MixedTypes { span, .. }
            | CompileError::WrongConditionType { span, .. }
            | CompileError::TooManyVariables { span }
            | CompileError::VariableConflict { span, .. }
            | CompileError::MisplacedVariable { span }
            | CompileError::MisplacedHead { span }
            | CompileError::MisplacedAll { span }
            | CompileError::InvalidQuantifier { span, .. }
            | CompileError::RepetitionTooLarge { span, .. }
            | CompileError::PatternTooLarge { span, .. }
            | CompileError::OutOfMemory { span } => span.clone(),
        }
    }

    /// Attach `span` to an automaton construction failure.
    pub(crate) fn automaton(err: BuildError, span: Range<usize>) -> Self {
        match err {
            BuildError::InvalidRange { min, max } => {
                CompileError::InvalidQuantifier { min, max, span }
            }
            BuildError::OutOfMemory => CompileError::OutOfMemory { span },
            reason @ (BuildError::TooManyNodes | BuildError::TooManyStates) => {
                CompileError::PatternTooLarge { reason, span }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
