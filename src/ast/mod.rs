use crate::functions::Function;
use std::fmt;

mod error;
mod evaluator;
mod parser;
mod preprocess;

pub use error::*;
pub use evaluator::Evaluator;
pub use parser::{FormulaParser as Parser, DEFAULT_MAX_DEPTH};
pub use preprocess::{preprocess, APPLY_MARKER};

/// Parsed formula. Immutable once returned by the parser and safe to share
/// across threads while sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    NumberLiteral(f64),
    /// A constant (`pi`, `e`), a function name on the left of an apply node,
    /// or anything else, which stands for the free variable.
    Identifier(String),
    BinaryNode {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::BinaryNode {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds an apply node calling `function` on `argument`.
    pub fn apply(function: &str, argument: Expression) -> Self {
        Self::binary(
            Operator::Apply,
            Expression::Identifier(function.to_string()),
            argument,
        )
    }

    pub fn identifier(name: &str) -> Self {
        Expression::Identifier(name.to_string())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::NumberLiteral(n) => write!(f, "{}", n),
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::BinaryNode {
                operator: Operator::Apply,
                left,
                right,
            } => write!(f, "{}({})", left, right),
            Expression::BinaryNode {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator.symbol(), right),
        }
    }
}

/// Additive operators re-root the tree; multiplicative ones nest to the right
/// of a preceding additive operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Mono,
    Binary,
    Apply,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Apply,
}

/// How `/` and `%` treat their divisor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ArithmeticMode {
    /// Zero divisors yield `0`, `%` is the remainder.
    #[default]
    Corrected,
    /// Inverted guards kept for documents written against the old plotter:
    /// non-zero divisors yield `0` and `%` adds the floors of its operands.
    Legacy,
}

/// A reduced operand. Function names survive evaluation until an apply node
/// consumes them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Function(Function),
}

fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Modulo => '%',
            Operator::Power => '^',
            Operator::Apply => APPLY_MARKER,
        }
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            Operator::Add | Operator::Subtract => OperatorClass::Mono,
            Operator::Multiply | Operator::Divide | Operator::Modulo | Operator::Power => {
                OperatorClass::Binary
            }
            Operator::Apply => OperatorClass::Apply,
        }
    }

    pub fn is_mono(&self) -> bool {
        self.class() == OperatorClass::Mono
    }

    /// Applies the operator. Never fails: NaN collapses to `0` and a function
    /// name used as an arithmetic operand yields `0`.
    pub fn apply(&self, mode: ArithmeticMode, left: Value, right: Value) -> f64 {
        if let Operator::Apply = self {
            return match (left, right) {
                (Value::Function(function), Value::Number(argument)) => function.apply(argument),
                _ => 0.0,
            };
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return 0.0;
        };

        match (self, mode) {
            (Operator::Add, _) => nan_to_zero(a + b),
            (Operator::Subtract, _) => nan_to_zero(a - b),
            (Operator::Multiply, _) => nan_to_zero(a * b),
            (Operator::Power, _) => nan_to_zero(a.powf(b)),
            (Operator::Divide, ArithmeticMode::Corrected) => {
                if b == 0.0 {
                    0.0
                } else {
                    nan_to_zero(a / b)
                }
            }
            (Operator::Modulo, ArithmeticMode::Corrected) => {
                if b == 0.0 {
                    0.0
                } else {
                    nan_to_zero(a % b)
                }
            }
            (Operator::Divide, ArithmeticMode::Legacy) => {
                if b != 0.0 {
                    0.0
                } else {
                    nan_to_zero(a / b)
                }
            }
            (Operator::Modulo, ArithmeticMode::Legacy) => {
                if b != 0.0 {
                    0.0
                } else {
                    nan_to_zero(a.floor() + b.floor())
                }
            }
            (Operator::Apply, _) => 0.0,
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = String;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            '%' => Ok(Operator::Modulo),
            '^' => Ok(Operator::Power),
            APPLY_MARKER => Ok(Operator::Apply),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}
