use crate::functions::KEYWORDS;

/// Appended to a function keyword so the parser can tell an application from
/// a bare identifier. Reserved: never valid as an identifier or operator.
pub const APPLY_MARKER: char = '_';

/// Prepares raw formula text for [`crate::ast::Parser`].
///
/// Trims the input, turns a leading unary sign into a subtraction from `0`
/// and tags every function keyword with [`APPLY_MARKER`]. Keywords match
/// ASCII case-insensitively, longest first, and an already tagged keyword is
/// left alone so the rewrite is idempotent.
pub fn preprocess(formula: &str) -> String {
    let trimmed = formula.trim();
    let signed = with_leading_operand(trimmed);

    let mut out = String::with_capacity(signed.len() + 8);
    let mut rest: &str = &signed;

    while !rest.is_empty() {
        if let Some(keyword) = KEYWORDS.iter().find(|k| starts_with_ignore_case(rest, k)) {
            let (matched, tail) = rest.split_at(keyword.len());
            out.push_str(matched);
            if !tail.starts_with(APPLY_MARKER) {
                out.push(APPLY_MARKER);
            }
            rest = tail;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }

    out
}

/// Prefixes `0` when the text opens with a unary `+` or `-`.
pub(crate) fn with_leading_operand(formula: &str) -> std::borrow::Cow<'_, str> {
    if formula.starts_with(['+', '-']) {
        format!("0{}", formula).into()
    } else {
        formula.into()
    }
}

fn starts_with_ignore_case(text: &str, keyword: &str) -> bool {
    text.len() >= keyword.len()
        && text.as_bytes()[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
}
