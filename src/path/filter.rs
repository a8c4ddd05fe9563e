//! Filter predicate parsing and evaluation.
//!
//! A predicate is at most `lhs op rhs`, split by a single-pass scan over
//! the raw text: a space outside single quotes advances the stage, a
//! closing quote completes the current field. A lone left side is an
//! existence test. Sides beginning `@.` resolve against the candidate
//! node, `$.` against the document root; anything else is a literal.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::error::JsonPathError;
use crate::path::access::{key_of, resolve_index};
use crate::path::step::Step;
use crate::path::tokenize::tokenize;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterOp {
    /// Bare `@.path` — true when the left side resolves to non-null.
    Exists,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `=~` — regex match against a string left side.
    Match,
}

impl FilterOp {
    fn parse(raw: &str) -> Result<Self, JsonPathError> {
        match raw {
            "exists" => Ok(FilterOp::Exists),
            "<" => Ok(FilterOp::Lt),
            "<=" => Ok(FilterOp::Le),
            "==" => Ok(FilterOp::Eq),
            ">=" => Ok(FilterOp::Ge),
            ">" => Ok(FilterOp::Gt),
            "=~" => Ok(FilterOp::Match),
            other => Err(JsonPathError::UnknownOperator(other.to_string())),
        }
    }
}

/// A parsed predicate, ready to test candidates.
#[derive(Debug)]
pub(crate) struct Predicate {
    pub(crate) lhs: String,
    pub(crate) op: FilterOp,
    pub(crate) rhs: String,
    regex: Option<Regex>,
}

impl Predicate {
    /// Parse the raw predicate text of a filter step.
    pub(crate) fn parse(raw: &str) -> Result<Self, JsonPathError> {
        let (lhs, op_raw, rhs) = split_predicate(raw)?;
        let op = FilterOp::parse(&op_raw)?;
        let regex = if op == FilterOp::Match {
            Some(compile_regex_literal(&rhs)?)
        } else {
            None
        };
        Ok(Self { lhs, op, rhs, regex })
    }

    /// Evaluate against one candidate child and the document root.
    pub(crate) fn matches(&self, candidate: &Value, root: &Value) -> Result<bool, JsonPathError> {
        match self.op {
            FilterOp::Exists => {
                let side = resolve_side(&self.lhs, candidate, root)?;
                Ok(!matches!(side, None | Some(Operand::Json(Value::Null))))
            }
            FilterOp::Match => {
                let regex = self
                    .regex
                    .as_ref()
                    .ok_or_else(|| JsonPathError::RegexForm(self.rhs.clone()))?;
                match resolve_side(&self.lhs, candidate, root)? {
                    None => Ok(false),
                    Some(Operand::Json(Value::String(text))) => Ok(regex.is_match(text)),
                    Some(Operand::Literal(text)) => Ok(regex.is_match(text)),
                    Some(Operand::Json(_)) => Err(JsonPathError::RegexOperand),
                }
            }
            comparator => {
                let (Some(lhs), Some(rhs)) = (
                    resolve_side(&self.lhs, candidate, root)?,
                    resolve_side(&self.rhs, candidate, root)?,
                ) else {
                    // A side that fails to resolve makes the predicate
                    // false rather than aborting the query.
                    return Ok(false);
                };
                let ordering = match (lhs.as_decimal(), rhs.as_decimal()) {
                    (Some(a), Some(b)) => a.compare(&b),
                    _ => lhs.as_text().cmp(&rhs.as_text()),
                };
                Ok(match comparator {
                    FilterOp::Lt => ordering == Ordering::Less,
                    FilterOp::Le => ordering != Ordering::Greater,
                    FilterOp::Eq => ordering == Ordering::Equal,
                    FilterOp::Ge => ordering != Ordering::Less,
                    FilterOp::Gt => ordering == Ordering::Greater,
                    FilterOp::Exists | FilterOp::Match => unreachable!("handled above"),
                })
            }
        }
    }
}

/// One resolved predicate side.
enum Operand<'a> {
    /// A value found by walking `@.` or `$.`.
    Json(&'a Value),
    /// Literal text from the predicate itself.
    Literal(&'a str),
}

impl Operand<'_> {
    /// Numeric view: numbers keep the lexical form the decoder retained,
    /// and strings qualify when their content parses as a decimal.
    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Operand::Json(Value::Number(n)) => Decimal::parse(&n.to_string()),
            Operand::Json(Value::String(s)) => Decimal::parse(s),
            Operand::Literal(s) => Decimal::parse(s),
            Operand::Json(_) => None,
        }
    }

    /// Textual view used when either side is non-numeric.
    fn as_text(&self) -> String {
        match self {
            Operand::Literal(s) => (*s).to_string(),
            Operand::Json(Value::String(s)) => s.clone(),
            Operand::Json(Value::Null) => "null".to_string(),
            Operand::Json(other) => other.to_string(),
        }
    }
}

/// A decimal literal normalised for exact comparison: sign, significant
/// digits, and the power of ten of the leading digit. `-12.30e2` becomes
/// negative, digits `"123"`, msd `3`. Comparing over the lexical form
/// keeps integers beyond f64 precision distinct.
#[derive(Debug)]
struct Decimal {
    negative: bool,
    /// Significant digits without leading or trailing zeros; empty means
    /// the value is zero.
    digits: String,
    /// Power of ten of the most significant digit.
    msd: i128,
}

impl Decimal {
    /// Parse a decimal literal: optional sign, digits with at most one
    /// point, optional exponent. Anything else (blank, `inf`, `nan`,
    /// embedded spaces) is rejected.
    fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut pos = 0;
        let negative = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };

        let int_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let int_digits = &text[int_start..pos];

        let frac_digits = if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            &text[start..pos]
        } else {
            ""
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }

        let mut exponent = 0i128;
        if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
            pos += 1;
            let start = pos;
            if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
                pos += 1;
            }
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            exponent = text[start..pos].parse().ok()?;
        }
        if pos != bytes.len() {
            return None;
        }

        let mantissa = format!("{int_digits}{frac_digits}");
        let significant = mantissa.trim_start_matches('0');
        if significant.is_empty() {
            return Some(Self {
                negative: false,
                digits: String::new(),
                msd: 0,
            });
        }
        let msd = exponent - frac_digits.len() as i128 + significant.len() as i128 - 1;
        Some(Self {
            negative,
            digits: significant.trim_end_matches('0').to_string(),
            msd,
        })
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Total order over exact values: `1`, `1.0`, and `1e0` are equal.
    fn compare(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => {
                if other.negative {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, true) => {
                if self.negative {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, false) => {
                if self.negative != other.negative {
                    return if self.negative {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    };
                }
                // Same sign: the leading-digit power decides, then the
                // digit strings (no trailing zeros, so a prefix is
                // strictly smaller).
                let magnitude = self
                    .msd
                    .cmp(&other.msd)
                    .then_with(|| self.digits.cmp(&other.digits));
                if self.negative {
                    magnitude.reverse()
                } else {
                    magnitude
                }
            }
        }
    }
}

/// Resolve one side: `@.` walks the candidate, `$.` walks the root,
/// anything else is literal text. `None` means the walk missed.
fn resolve_side<'a>(
    side: &'a str,
    candidate: &'a Value,
    root: &'a Value,
) -> Result<Option<Operand<'a>>, JsonPathError> {
    if side.starts_with("@.") {
        return Ok(side_path_value(candidate, side)?.map(Operand::Json));
    }
    if side.starts_with("$.") {
        return Ok(side_path_value(root, side)?.map(Operand::Json));
    }
    Ok(Some(Operand::Literal(side)))
}

/// Walk a filter-side path over `origin`. Only key steps and a single
/// array index are supported; a miss resolves to `None`.
fn side_path_value<'a>(
    origin: &'a Value,
    path: &str,
) -> Result<Option<&'a Value>, JsonPathError> {
    let mut current = origin;
    for token in tokenize(path)? {
        match Step::parse(&token)? {
            Step::Root => {}
            Step::Key(key) => match key_of(current, &key) {
                Some(child) => current = child,
                None => return Ok(None),
            },
            Step::Indices { key, indices } => {
                if indices.len() != 1 {
                    return Err(JsonPathError::FilterPath(path.to_string()));
                }
                if !key.is_empty() {
                    match key_of(current, &key) {
                        Some(child) => current = child,
                        None => return Ok(None),
                    }
                }
                let Value::Array(arr) = current else {
                    return Ok(None);
                };
                match resolve_index(indices[0], arr.len()) {
                    Some(i) => current = &arr[i],
                    None => return Ok(None),
                }
            }
            _ => return Err(JsonPathError::FilterPath(path.to_string())),
        }
    }
    Ok(Some(current))
}

/// Split raw predicate text into `(lhs, op, rhs)`.
///
/// Stage 0 collects the left side, stage 1 the operator, stage 2 the
/// right side. Space advances the stage; single quotes protect spaces and
/// a closing quote completes the current field. A buffer left at end of
/// input in stage 0 is an existence test.
fn split_predicate(raw: &str) -> Result<(String, String, String), JsonPathError> {
    let mut fields = [String::new(), String::new(), String::new()];
    let mut buf = String::new();
    let mut stage = 0usize;
    let mut quoted = false;

    for ch in raw.chars() {
        match ch {
            '\'' => {
                if quoted {
                    fields[stage] = std::mem::take(&mut buf);
                }
                quoted = !quoted;
            }
            ' ' if quoted => buf.push(' '),
            ' ' => {
                if !buf.is_empty() {
                    fields[stage] = std::mem::take(&mut buf);
                }
                stage += 1;
                if stage > 2 {
                    return Err(JsonPathError::MalformedFilter(raw.to_string()));
                }
            }
            _ => buf.push(ch),
        }
    }
    if !buf.is_empty() {
        if stage == 0 {
            fields[0] = buf;
            fields[1] = "exists".to_string();
        } else {
            fields[stage] = buf;
        }
    }

    let [lhs, op, rhs] = fields;
    Ok((lhs, op, rhs))
}

/// Compile the `/pattern/` literal of an `=~` predicate.
fn compile_regex_literal(raw: &str) -> Result<Regex, JsonPathError> {
    if raw.len() <= 2 || !raw.starts_with('/') || !raw.ends_with('/') {
        return Err(JsonPathError::RegexForm(raw.to_string()));
    }
    Ok(Regex::new(&raw[1..raw.len() - 1])?)
}
