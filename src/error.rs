//! Error types for path compilation, evaluation, and mutation.

use thiserror::Error;

/// Errors surfaced by the public API.
///
/// Every failure is returned, never panicked. Within a single evaluation a
/// failing match aborts the whole query; lenient misses (absent keys,
/// wrong-typed candidates under a wildcard fan-out) are dropped from the
/// match set instead of being raised here.
#[derive(Debug, Error)]
pub enum JsonPathError {
    /// Expression did not begin with `$` or `@`.
    #[error("path must start with '$' or '@'")]
    MissingRoot,

    /// A bracket group was empty or never closed.
    #[error("malformed bracket group in '{0}'")]
    MalformedBracket(String),

    /// An index list element was not a signed integer.
    #[error("invalid array index '{0}'")]
    InvalidIndex(String),

    /// A range had more than one `:` or a non-integer bound.
    #[error("invalid range '{0}'")]
    InvalidRange(String),

    /// A filter body was not of the `?(...)` form, or its predicate did
    /// not split into sides and an operator.
    #[error("malformed filter '{0}'")]
    MalformedFilter(String),

    /// A filter operator other than `<`, `<=`, `==`, `>=`, `>`, `=~`.
    #[error("unsupported filter operator '{0}'")]
    UnknownOperator(String),

    /// The right side of `=~` was not a `/pattern/` literal.
    #[error("regex operand must be of the form /pattern/, got '{0}'")]
    RegexForm(String),

    /// The pattern inside `/.../` failed to compile.
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    /// The left side of `=~` resolved to a non-string value.
    #[error("only strings can be matched against a regex")]
    RegexOperand,

    /// A filter side used path syntax beyond keys and a single index.
    #[error("unsupported expression in filter path '{0}'")]
    FilterPath(String),

    /// Strict array addressing hit a value that is not an array.
    #[error("cannot index into a non-array value")]
    NotAnArray,

    /// An explicit index fell outside the array.
    #[error("index out of range: len {len}, index {index}")]
    IndexOutOfRange {
        /// Length of the addressed array.
        len: usize,
        /// The index as written, before negative resolution.
        index: i64,
    },

    /// A range bound fell outside the array.
    #[error("range bound out of range: len {len}, bound {bound}")]
    RangeOutOfRange {
        /// Length of the addressed array.
        len: usize,
        /// The offending bound as written.
        bound: i64,
    },

    /// A range was applied to an unsupported target.
    #[error("range not supported here: {0}")]
    RangeUnsupported(&'static str),

    /// A concrete path did not start at `$` or had a malformed segment.
    #[error("invalid concrete path '{0}'")]
    InvalidConcretePath(String),

    /// A rename rule was structurally invalid.
    #[error("invalid rename rule: {0}")]
    InvalidRenameRule(String),

    /// Template input did not decode to a JSON object at the top level.
    #[error("template document must be a JSON object")]
    TemplateRoot,

    /// Template input was not valid JSON.
    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),
}
