pub mod other;
pub mod trigonometric;

use std::fmt;

/// Function keywords, longest first where one is a prefix of another.
pub const KEYWORDS: [&str; 16] = [
    "sinh", "cosh", "tanh", "asin", "acos", "atan", "sin", "cos", "tan", "log", "floor", "ceil",
    "random", "abs", "sign", "sqrt",
];

/// Named single-argument functions callable from a formula.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Floor,
    Ceil,
    Random,
    Abs,
    Sign,
    Sqrt,
}

impl Function {
    /// Every function, in [`KEYWORDS`] order.
    pub const ALL: [Function; 16] = [
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Log,
        Function::Floor,
        Function::Ceil,
        Function::Random,
        Function::Abs,
        Function::Sign,
        Function::Sqrt,
    ];

    /// Looks up a function by keyword, ignoring ASCII case, without allocating.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Log => "log",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Random => "random",
            Function::Abs => "abs",
            Function::Sign => "sign",
            Function::Sqrt => "sqrt",
        }
    }

    /// Out-of-domain arguments yield `0` so one bad sample never breaks a plot.
    pub fn apply(&self, v: f64) -> f64 {
        match self {
            Function::Sin => trigonometric::sin(v),
            Function::Cos => trigonometric::cos(v),
            Function::Tan => trigonometric::tan(v),
            Function::Asin => trigonometric::asin(v),
            Function::Acos => trigonometric::acos(v),
            Function::Atan => trigonometric::atan(v),
            Function::Sinh => trigonometric::sinh(v),
            Function::Cosh => trigonometric::cosh(v),
            Function::Tanh => trigonometric::tanh(v),
            Function::Log => other::log(v),
            Function::Floor => other::floor(v),
            Function::Ceil => other::ceil(v),
            Function::Random => other::random(v),
            Function::Abs => other::abs(v),
            Function::Sign => other::sign(v),
            Function::Sqrt => other::sqrt(v),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
