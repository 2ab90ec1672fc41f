use std::fmt;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    LackOfFunctionIdentifier,
    LackOfOperator,
    LackOfIdentifier,
    /// A `)` with no matching `(`.
    LackOfBra,
    /// A `(` that is never closed.
    LackOfCket,
    EmptyInput,
    /// A function keyword not followed by a parenthesised argument.
    MissingArgument,
    NestingTooDeep { limit: usize },
    Unreachable,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::LackOfFunctionIdentifier => {
                write!(f, "Parse Error: function identifier expected")
            }
            ParseErrorKind::LackOfOperator => write!(f, "Parse Error: binary operator expected"),
            ParseErrorKind::LackOfIdentifier => write!(f, "Parse Error: identifier expected"),
            ParseErrorKind::LackOfBra => write!(f, "Parse Error: unmatched )"),
            ParseErrorKind::LackOfCket => write!(f, "Parse Error: unmatched ("),
            ParseErrorKind::EmptyInput => write!(f, "Parse Error: empty input"),
            ParseErrorKind::MissingArgument => {
                write!(f, "Parse Error: parenthesised function argument expected")
            }
            ParseErrorKind::NestingTooDeep { limit } => {
                write!(f, "Parse Error: nesting deeper than {}", limit)
            }
            ParseErrorKind::Unreachable => write!(f, "UnreachableError"),
        }
    }
}

/// Error raised when a formula does not conform to the grammar.
///
/// `position` is the byte offset in the text handed to the failing
/// (sub-)parse, when one is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Option<usize>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }

    pub fn at(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position: Some(position),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{}. pos: {}", self.kind, pos),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The tree reduced to an unapplied function name instead of a number.
    #[error("Invalid Argument: `{0}` is a function, not a value")]
    InvalidArgument(String),
}

/// Either stage failing during one-shot evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
