use crate::ast::preprocess::{preprocess, with_leading_operand, APPLY_MARKER};
use crate::ast::{Expression, Operator, ParseError, ParseErrorKind};
use log::{debug, trace};

/// Default bound on both parenthesis/re-nesting recursion and tree depth.
///
/// Tree depth grows with operator chains as well as with parentheses: the
/// left-associated sum `x+x+...+x` of `n` terms is `n` levels deep, so a flat
/// chain of more than this many terms is rejected with
/// [`ParseErrorKind::NestingTooDeep`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Single left-to-right scanner for formula text.
///
/// Additive operators (`+ -`) always re-root the node built so far, so runs
/// of them associate to the left. A multiplicative operator (`* / % ^`)
/// following an additive one instead pulls the whole remainder of the text
/// into a nested sub-tree on the right, which is how it binds tighter.
/// Runs of multiplicative operators re-root and associate to the left.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormulaParser {
    max_depth: usize,
}

impl Default for FormulaParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl FormulaParser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parses raw formula text with the default depth limit.
    pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
        Self::default().parse(input)
    }

    /// Preprocesses and parses raw formula text.
    pub fn parse(&self, input: &str) -> Result<Expression, ParseError> {
        debug!("Parsing formula: {}", input);
        let prepared = preprocess(input);
        let tree = self.parse_preprocessed(&prepared)?;
        debug!("Parse result: {}", tree);
        Ok(tree)
    }

    /// Parses text that already went through [`preprocess`].
    pub fn parse_preprocessed(&self, text: &str) -> Result<Expression, ParseError> {
        scan(text, Mapping::Empty, 0, self.max_depth).map(|node| node.expr)
    }
}

/// A finished sub-tree together with its depth.
#[derive(Debug, Clone)]
struct Node {
    expr: Expression,
    depth: usize,
}

impl Node {
    fn leaf(expr: Expression) -> Self {
        Self { expr, depth: 1 }
    }
}

fn combine(
    operator: Operator,
    left: Node,
    right: Node,
    max_depth: usize,
) -> Result<Node, ParseError> {
    let depth = left.depth.max(right.depth) + 1;
    if depth > max_depth {
        return Err(ParseError::new(ParseErrorKind::NestingTooDeep {
            limit: max_depth,
        }));
    }
    Ok(Node {
        expr: Expression::binary(operator, left.expr, right.expr),
        depth,
    })
}

/// The operand being collected. At most one kind is pending at a time.
#[derive(Debug, Clone, Default)]
enum Pending {
    #[default]
    None,
    Number(String),
    Identifier(String),
    Group(Node),
}

impl Pending {
    fn is_none(&self) -> bool {
        matches!(self, Pending::None)
    }

    /// A number buffer with no numeric prefix resolves to nothing.
    fn resolve(self) -> Option<Node> {
        match self {
            Pending::None => None,
            Pending::Number(text) => {
                parse_float_prefix(&text).map(|value| Node::leaf(Expression::NumberLiteral(value)))
            }
            Pending::Identifier(name) => Some(Node::leaf(Expression::Identifier(name))),
            Pending::Group(node) => Some(node),
        }
    }
}

/// The binary node being assembled at the current bracket depth.
#[derive(Debug, Clone, Default)]
enum Mapping {
    #[default]
    Empty,
    Open { operator: Operator, left: Node },
}

#[derive(Debug, Clone, Default)]
struct ScanState {
    mapping: Mapping,
    pending: Pending,
    group: String,
    bracket_depth: usize,
    /// Function name waiting for its parenthesised argument.
    apply: Option<String>,
}

enum Step {
    Continue(ScanState),
    /// A right-nested parse consumed the rest of the text.
    Done(Node),
}

#[derive(Debug, Copy, Clone)]
struct Scan<'a> {
    text: &'a str,
    level: usize,
    max_depth: usize,
}

impl Scan<'_> {
    fn descend(&self, text: &str, seed: Mapping) -> Result<Node, ParseError> {
        scan(text, seed, self.level + 1, self.max_depth)
    }
}

fn scan(text: &str, seed: Mapping, level: usize, max_depth: usize) -> Result<Node, ParseError> {
    if level > max_depth {
        return Err(ParseError::new(ParseErrorKind::NestingTooDeep {
            limit: max_depth,
        }));
    }

    let formula = with_leading_operand(text);
    let ctx = Scan {
        text: &formula,
        level,
        max_depth,
    };
    let mut state = ScanState {
        mapping: seed,
        ..Default::default()
    };

    for (i, c) in formula.char_indices() {
        if c.is_whitespace() {
            continue;
        }

        state = if state.bracket_depth > 0 {
            state.in_group(c, i, ctx)?
        } else {
            match c {
                '(' => state.open_group(i)?,
                ')' => return Err(ParseError::at(ParseErrorKind::LackOfBra, i)),
                APPLY_MARKER => state.mark_apply(i)?,
                _ => match Operator::try_from(c) {
                    Ok(operator) => match state.push_operator(operator, i, ctx)? {
                        Step::Continue(next) => next,
                        Step::Done(node) => return Ok(node),
                    },
                    Err(_) => state.push_char(c, i)?,
                },
            }
        };
    }

    state.finish(ctx)
}

impl ScanState {
    fn ensure_no_pending_apply(&self, i: usize) -> Result<(), ParseError> {
        if self.apply.is_some() {
            Err(ParseError::at(ParseErrorKind::MissingArgument, i))
        } else {
            Ok(())
        }
    }

    fn open_group(mut self, i: usize) -> Result<Self, ParseError> {
        if !self.pending.is_none() {
            return Err(ParseError::at(ParseErrorKind::LackOfOperator, i));
        }
        self.bracket_depth = 1;
        Ok(self)
    }

    fn in_group(mut self, c: char, i: usize, ctx: Scan<'_>) -> Result<Self, ParseError> {
        match c {
            '(' => self.bracket_depth += 1,
            ')' => {
                self.bracket_depth -= 1;
                if self.bracket_depth == 0 {
                    return self.close_group(i, ctx);
                }
            }
            _ => {}
        }
        self.group.push(c);
        Ok(self)
    }

    fn close_group(mut self, i: usize, ctx: Scan<'_>) -> Result<Self, ParseError> {
        let text = std::mem::take(&mut self.group);
        let node = match self.apply.take() {
            Some(name) => {
                let argument = ctx.descend(&text, Mapping::Empty)?;
                let function = Node::leaf(Expression::Identifier(name));
                combine(Operator::Apply, function, argument, ctx.max_depth)?
            }
            None if text.is_empty() => {
                return Err(ParseError::at(ParseErrorKind::Unreachable, i));
            }
            None => ctx.descend(&text, Mapping::Empty)?,
        };
        self.pending = Pending::Group(node);
        Ok(self)
    }

    fn mark_apply(mut self, i: usize) -> Result<Self, ParseError> {
        match std::mem::take(&mut self.pending) {
            Pending::Identifier(name) if self.apply.is_none() => {
                self.apply = Some(name);
                Ok(self)
            }
            _ => Err(ParseError::at(ParseErrorKind::LackOfFunctionIdentifier, i)),
        }
    }

    fn push_char(mut self, c: char, i: usize) -> Result<Self, ParseError> {
        self.ensure_no_pending_apply(i)?;
        let numeral = c.is_ascii_digit() || c == '.';
        self.pending = match (std::mem::take(&mut self.pending), numeral) {
            (Pending::None, true) => Pending::Number(c.to_string()),
            (Pending::None, false) => Pending::Identifier(c.to_string()),
            (Pending::Number(mut text), _) => {
                text.push(c);
                Pending::Number(text)
            }
            (Pending::Identifier(mut name), false) => {
                name.push(c);
                Pending::Identifier(name)
            }
            (Pending::Identifier(_), true) | (Pending::Group(_), _) => {
                return Err(ParseError::at(ParseErrorKind::LackOfOperator, i));
            }
        };
        Ok(self)
    }

    fn push_operator(
        mut self,
        operator: Operator,
        i: usize,
        ctx: Scan<'_>,
    ) -> Result<Step, ParseError> {
        self.ensure_no_pending_apply(i)?;
        let value = std::mem::take(&mut self.pending)
            .resolve()
            .ok_or_else(|| ParseError::at(ParseErrorKind::LackOfIdentifier, i))?;

        self.mapping = match std::mem::take(&mut self.mapping) {
            Mapping::Empty => Mapping::Open {
                operator,
                left: value,
            },
            Mapping::Open {
                operator: previous,
                left,
            } if previous.is_mono() && !operator.is_mono() => {
                trace!("Nesting '{}' right of '{}' at {}", operator.symbol(), previous.symbol(), i);
                let seed = Mapping::Open {
                    operator,
                    left: value,
                };
                let nested = ctx.descend(&ctx.text[i + 1..], seed)?;
                return combine(previous, left, nested, ctx.max_depth).map(Step::Done);
            }
            Mapping::Open {
                operator: previous,
                left,
            } => {
                trace!("Re-rooting under '{}' at {}", operator.symbol(), i);
                Mapping::Open {
                    operator,
                    left: combine(previous, left, value, ctx.max_depth)?,
                }
            }
        };
        Ok(Step::Continue(self))
    }

    fn finish(mut self, ctx: Scan<'_>) -> Result<Node, ParseError> {
        if self.bracket_depth > 0 {
            return Err(ParseError::new(ParseErrorKind::LackOfCket));
        }
        if self.apply.is_some() {
            return Err(ParseError::new(ParseErrorKind::MissingArgument));
        }

        let trailing = std::mem::take(&mut self.pending).resolve();
        match self.mapping {
            Mapping::Empty => trailing.ok_or_else(|| ParseError::new(ParseErrorKind::EmptyInput)),
            Mapping::Open { operator, left } => {
                let right = trailing.unwrap_or_else(|| Node::leaf(Expression::NumberLiteral(0.0)));
                combine(operator, left, right, ctx.max_depth)
            }
        }
    }
}

/// Reads the longest decimal prefix of `text`, so `2x` reads as `2` and
/// `1.5.2` as `1.5`. Returns `None` when there is no leading digit.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut j: usize| {
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let mut end = digits_from(0);
    let mut digit_count = end;
    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        digit_count += fraction_end - end - 1;
        end = fraction_end;
    }
    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exponent_end = digits_from(j);
        if exponent_end > j {
            end = exponent_end;
        }
    }

    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Expression, ParseError> {
        FormulaParser::parse_expression(input)
    }

    fn kind(input: &str) -> ParseErrorKind {
        parse(input).unwrap_err().kind
    }

    fn n(value: f64) -> Expression {
        Expression::NumberLiteral(value)
    }

    fn id(name: &str) -> Expression {
        Expression::identifier(name)
    }

    fn bin(operator: Operator, left: Expression, right: Expression) -> Expression {
        Expression::binary(operator, left, right)
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("42").unwrap(), n(42.0));
        assert_eq!(parse("3.25").unwrap(), n(3.25));
        assert_eq!(parse("x").unwrap(), id("x"));
        assert_eq!(parse("pi").unwrap(), id("pi"));
    }

    #[test]
    fn test_additive_runs_associate_left() {
        assert_eq!(
            parse("1-2+3").unwrap(),
            bin(
                Operator::Add,
                bin(Operator::Subtract, n(1.0), n(2.0)),
                n(3.0)
            )
        );
    }

    #[test]
    fn test_multiplicative_runs_associate_left() {
        assert_eq!(
            parse("2^3^2").unwrap(),
            bin(
                Operator::Power,
                bin(Operator::Power, n(2.0), n(3.0)),
                n(2.0)
            )
        );
    }

    #[test]
    fn test_multiplicative_after_additive_nests_right() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            bin(
                Operator::Add,
                n(1.0),
                bin(Operator::Multiply, n(2.0), n(3.0))
            )
        );
        assert_eq!(
            parse("2*3+1").unwrap(),
            bin(
                Operator::Add,
                bin(Operator::Multiply, n(2.0), n(3.0)),
                n(1.0)
            )
        );
    }

    #[test]
    fn test_nested_remainder_owns_the_rest() {
        // Everything after `*` belongs to the nested call.
        assert_eq!(
            parse("1-2*3-4").unwrap(),
            bin(
                Operator::Subtract,
                n(1.0),
                bin(
                    Operator::Subtract,
                    bin(Operator::Multiply, n(2.0), n(3.0)),
                    n(4.0)
                )
            )
        );
    }

    #[test]
    fn test_function_application() {
        assert_eq!(parse("sin(x)").unwrap(), Expression::apply("sin", id("x")));
        assert_eq!(
            parse("sqrt(x)*(2)").unwrap(),
            bin(
                Operator::Multiply,
                Expression::apply("sqrt", id("x")),
                n(2.0)
            )
        );
        assert_eq!(
            parse("sinh(cos(x))").unwrap(),
            Expression::apply("sinh", Expression::apply("cos", id("x")))
        );
    }

    #[test]
    fn test_leading_sign() {
        assert_eq!(
            parse("-x").unwrap(),
            bin(Operator::Subtract, n(0.0), id("x"))
        );
        assert_eq!(
            parse("(-x)").unwrap(),
            bin(Operator::Subtract, n(0.0), id("x"))
        );
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(parse("  1 +\t2 ").unwrap(), parse("1+2").unwrap());
        assert_eq!(parse("sin ( x )").unwrap(), parse("sin(x)").unwrap());
    }

    #[test]
    fn test_trailing_operator_defaults_to_zero() {
        assert_eq!(
            parse("1+").unwrap(),
            bin(Operator::Add, n(1.0), n(0.0))
        );
    }

    #[test]
    fn test_zero_group_is_an_operand() {
        assert_eq!(
            parse("(0)+1").unwrap(),
            bin(Operator::Add, n(0.0), n(1.0))
        );
    }

    #[test]
    fn test_number_prefix() {
        assert_eq!(parse("2x").unwrap(), n(2.0));
        assert_eq!(parse("1.5.2").unwrap(), n(1.5));
        assert_eq!(parse("1e3").unwrap(), n(1000.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("7e"), Some(7.0));
    }

    #[test]
    fn test_deterministic() {
        let formula = "x^2 - 3*sin(x/2) + log(x)";
        assert_eq!(parse(formula).unwrap(), parse(formula).unwrap());
    }

    #[test]
    fn test_bracket_errors() {
        assert_eq!(kind("(1+2"), ParseErrorKind::LackOfCket);
        assert_eq!(kind("sin(x"), ParseErrorKind::LackOfCket);
        assert_eq!(parse("1+2)").unwrap_err(), ParseError::at(ParseErrorKind::LackOfBra, 3));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kind(""), ParseErrorKind::EmptyInput);
        assert_eq!(kind("   "), ParseErrorKind::EmptyInput);
        assert_eq!(kind("sin()"), ParseErrorKind::EmptyInput);
        assert_eq!(kind("()"), ParseErrorKind::Unreachable);
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            parse("*2").unwrap_err(),
            ParseError::at(ParseErrorKind::LackOfIdentifier, 0)
        );
        assert_eq!(kind("2*-3"), ParseErrorKind::LackOfIdentifier);
    }

    #[test]
    fn test_missing_operator() {
        assert_eq!(kind("x2"), ParseErrorKind::LackOfOperator);
        assert_eq!(kind("2(x)"), ParseErrorKind::LackOfOperator);
        assert_eq!(kind("(x)(x)"), ParseErrorKind::LackOfOperator);
        assert_eq!(kind("(x)y"), ParseErrorKind::LackOfOperator);
    }

    #[test]
    fn test_apply_marker_errors() {
        let parser = FormulaParser::default();
        assert_eq!(
            parser.parse_preprocessed("_(x)").unwrap_err(),
            ParseError::at(ParseErrorKind::LackOfFunctionIdentifier, 0)
        );
        assert_eq!(
            parser.parse_preprocessed("2_(x)").unwrap_err().kind,
            ParseErrorKind::LackOfFunctionIdentifier
        );
        assert_eq!(kind("sin x"), ParseErrorKind::MissingArgument);
        assert_eq!(kind("cos"), ParseErrorKind::MissingArgument);
    }

    #[test]
    fn test_nesting_limit() {
        let parser = FormulaParser::new(3);
        assert!(parser.parse("((x))").is_ok());
        assert_eq!(
            parser.parse("((((x))))").unwrap_err().kind,
            ParseErrorKind::NestingTooDeep { limit: 3 }
        );
        assert_eq!(
            parser.parse("x+x+x+x").unwrap_err().kind,
            ParseErrorKind::NestingTooDeep { limit: 3 }
        );
    }

    #[test]
    fn test_operator_chains_count_toward_depth() {
        let at_limit = vec!["x"; DEFAULT_MAX_DEPTH].join("+");
        assert!(FormulaParser::parse_expression(&at_limit).is_ok());

        let past_limit = vec!["x"; DEFAULT_MAX_DEPTH + 1].join("+");
        assert_eq!(
            kind(&past_limit),
            ParseErrorKind::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH
            }
        );
        assert!(FormulaParser::new(512).parse(&past_limit).is_ok());
    }

    #[test]
    fn test_deep_input_fails_fast() {
        let deep = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            kind(&deep),
            ParseErrorKind::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH
            }
        );
        let long_sum = vec!["x"; 10_000].join("+");
        assert_eq!(
            kind(&long_sum),
            ParseErrorKind::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH
            }
        );
    }
}
