//! Typed path steps parsed from coarse tokens.

use crate::error::JsonPathError;

/// One evaluation step of a compiled path.
///
/// Bracketed steps keep the key written before the bracket (possibly
/// empty, as in `$[0]`), so `book[0,1]` is a single step that first
/// descends into `book` and then selects the listed indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `$` or `@` — leaves the match set untouched.
    Root,
    /// `.key` — child access by object key.
    Key(String),
    /// `key[i,j,...]` — explicit index list; negative indices count from
    /// the end.
    Indices {
        /// Key applied before indexing, empty for `$[0]`-style steps.
        key: String,
        /// The indices as written.
        indices: Vec<i64>,
    },
    /// `key[from:to]` or `key[*]` — inclusive range over array slots or,
    /// with both bounds absent, every object entry.
    Range {
        /// Key applied before ranging, possibly empty.
        key: String,
        /// Lower bound, absent for `[:n]`.
        from: Option<i64>,
        /// Upper bound (inclusive), absent for `[n:]`.
        to: Option<i64>,
    },
    /// `key[?(predicate)]` — keep the children of `key` satisfying the
    /// predicate.
    Filter {
        /// Key applied before filtering, possibly empty.
        key: String,
        /// Raw predicate text, trimmed of surrounding spaces.
        predicate: String,
    },
    /// `*` — expand every current match to its direct children.
    Scan,
    /// `*[?(predicate)]` — scan one level, then filter the children of
    /// the expanded set.
    ScanFilter {
        /// Raw predicate text, trimmed of surrounding spaces.
        predicate: String,
    },
}

impl Step {
    /// Classify one token into a step.
    pub(crate) fn parse(token: &str) -> Result<Self, JsonPathError> {
        if token == "$" || token == "@" {
            return Ok(Step::Root);
        }
        if token == "*" {
            return Ok(Step::Scan);
        }
        let Some(bracket) = token.find('[') else {
            return Ok(Step::Key(token.to_string()));
        };

        let key = &token[..bracket];
        let tail = &token[bracket..];
        if tail.len() < 3 || !tail.ends_with(']') {
            return Err(JsonPathError::MalformedBracket(token.to_string()));
        }
        let body = &tail[1..tail.len() - 1];

        if body.contains('?') {
            let inner = body
                .strip_prefix("?(")
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(|| JsonPathError::MalformedFilter(token.to_string()))?;
            let predicate = inner.trim_matches(' ').to_string();
            if key == "*" {
                return Ok(Step::ScanFilter { predicate });
            }
            return Ok(Step::Filter {
                key: key.to_string(),
                predicate,
            });
        }

        if body.contains(':') {
            let halves: Vec<&str> = body.split(':').collect();
            if halves.len() != 2 {
                return Err(JsonPathError::InvalidRange(token.to_string()));
            }
            return Ok(Step::Range {
                key: key.to_string(),
                from: parse_bound(halves[0], token)?,
                to: parse_bound(halves[1], token)?,
            });
        }

        if body == "*" {
            return Ok(Step::Range {
                key: key.to_string(),
                from: None,
                to: None,
            });
        }

        let indices = body
            .split(',')
            .map(|raw| {
                let raw = raw.trim_matches(' ');
                raw.parse::<i64>()
                    .map_err(|_| JsonPathError::InvalidIndex(raw.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Step::Indices {
            key: key.to_string(),
            indices,
        })
    }
}

/// A range bound: blank means absent, anything else must be an integer.
fn parse_bound(raw: &str, token: &str) -> Result<Option<i64>, JsonPathError> {
    let raw = raw.trim_matches(' ');
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| JsonPathError::InvalidRange(token.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_scan() {
        assert_eq!(Step::parse("$").unwrap(), Step::Root);
        assert_eq!(Step::parse("@").unwrap(), Step::Root);
        assert_eq!(Step::parse("*").unwrap(), Step::Scan);
    }

    #[test]
    fn test_bare_key() {
        assert_eq!(Step::parse("store").unwrap(), Step::Key("store".into()));
    }

    #[test]
    fn test_index_lists() {
        assert_eq!(
            Step::parse("book[2]").unwrap(),
            Step::Indices { key: "book".into(), indices: vec![2] }
        );
        assert_eq!(
            Step::parse("book[-1]").unwrap(),
            Step::Indices { key: "book".into(), indices: vec![-1] }
        );
        assert_eq!(
            Step::parse("book[0, 1]").unwrap(),
            Step::Indices { key: "book".into(), indices: vec![0, 1] }
        );
        assert_eq!(
            Step::parse("[0]").unwrap(),
            Step::Indices { key: String::new(), indices: vec![0] }
        );
    }

    #[test]
    fn test_ranges() {
        assert_eq!(
            Step::parse("book[1:-1]").unwrap(),
            Step::Range { key: "book".into(), from: Some(1), to: Some(-1) }
        );
        assert_eq!(
            Step::parse("book[*]").unwrap(),
            Step::Range { key: "book".into(), from: None, to: None }
        );
        assert_eq!(
            Step::parse("book[:2]").unwrap(),
            Step::Range { key: "book".into(), from: None, to: Some(2) }
        );
        assert_eq!(
            Step::parse("book[-2:]").unwrap(),
            Step::Range { key: "book".into(), from: Some(-2), to: None }
        );
        assert_eq!(
            Step::parse("[:1]").unwrap(),
            Step::Range { key: String::new(), from: None, to: Some(1) }
        );
    }

    #[test]
    fn test_filters() {
        assert_eq!(
            Step::parse("book[?( @.isbn      )]").unwrap(),
            Step::Filter { key: "book".into(), predicate: "@.isbn".into() }
        );
        assert_eq!(
            Step::parse("book[?(@.price < 10)]").unwrap(),
            Step::Filter { key: "book".into(), predicate: "@.price < 10".into() }
        );
        assert_eq!(
            Step::parse("*[?(@.name == executor)]").unwrap(),
            Step::ScanFilter { predicate: "@.name == executor".into() }
        );
    }

    #[test]
    fn test_malformed_brackets() {
        assert!(matches!(
            Step::parse("book[]"),
            Err(JsonPathError::MalformedBracket(_))
        ));
        assert!(matches!(
            Step::parse("book[12"),
            Err(JsonPathError::MalformedBracket(_))
        ));
    }

    #[test]
    fn test_bad_indices_and_ranges() {
        assert!(matches!(
            Step::parse("book[a]"),
            Err(JsonPathError::InvalidIndex(_))
        ));
        assert!(matches!(
            Step::parse("book[0,x]"),
            Err(JsonPathError::InvalidIndex(_))
        ));
        assert!(matches!(
            Step::parse("book[1:2:3]"),
            Err(JsonPathError::InvalidRange(_))
        ));
        assert!(matches!(
            Step::parse("book[1:b]"),
            Err(JsonPathError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_filter_must_be_parenthesised() {
        assert!(matches!(
            Step::parse("book[?@.isbn]"),
            Err(JsonPathError::MalformedFilter(_))
        ));
    }
}
