//! Low-level value accessors shared by evaluation and filtering.
//!
//! Key access is lenient (a miss drops the candidate); explicit index
//! access is strict (a miss is an error). That split is what separates
//! tolerant iteration (scan, range, filter fan-out) from strict
//! addressing.

use serde_json::Value;

use crate::error::JsonPathError;

/// How a child is addressed from its parent, carrying the fragment it
/// contributes to a concrete match path.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChildKey {
    /// Array slot.
    Index(usize),
    /// Object entry.
    Key(String),
}

impl ChildKey {
    /// Path fragment appended to the parent's concrete path.
    pub(crate) fn suffix(&self) -> String {
        match self {
            ChildKey::Index(i) => format!("[{i}]"),
            ChildKey::Key(k) => format!(".{k}"),
        }
    }
}

/// Child bound to `key`, or `None` when `value` is not an object or lacks
/// the key.
pub(crate) fn key_of<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

/// Array element at `index`, counting from the end when negative.
pub(crate) fn index_of(value: &Value, index: i64) -> Result<&Value, JsonPathError> {
    let Value::Array(arr) = value else {
        return Err(JsonPathError::NotAnArray);
    };
    let len = arr.len();
    let resolved =
        resolve_index(index, len).ok_or(JsonPathError::IndexOutOfRange { len, index })?;
    Ok(&arr[resolved])
}

/// Normalise a possibly-negative index against `len`.
pub(crate) fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 { index + len as i64 } else { index };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

/// Children selected by an inclusive `[from:to]` range.
///
/// On arrays either bound may be absent (defaulting to the full extent)
/// and negative bounds count from the end. On objects both bounds must be
/// absent and every entry is returned. An empty array yields an empty
/// sub-range without error.
pub(crate) fn range_of<'a>(
    value: &'a Value,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<Vec<(ChildKey, &'a Value)>, JsonPathError> {
    match value {
        Value::Array(arr) => {
            if arr.is_empty() {
                return Ok(Vec::new());
            }
            let len = arr.len() as i64;
            let lower = match from {
                Some(f) if f < 0 => len + f,
                Some(f) => f,
                None => 0,
            };
            let upper = match to {
                Some(t) if t < 0 => len + t + 1,
                Some(t) => t + 1,
                None => len,
            };
            if lower < 0 || lower >= len {
                return Err(JsonPathError::RangeOutOfRange {
                    len: arr.len(),
                    bound: from.unwrap_or(0),
                });
            }
            if upper < 0 || upper > len {
                return Err(JsonPathError::RangeOutOfRange {
                    len: arr.len(),
                    bound: to.unwrap_or(0),
                });
            }
            Ok((lower..upper)
                .map(|i| (ChildKey::Index(i as usize), &arr[i as usize]))
                .collect())
        }
        Value::Object(map) => {
            if from.is_some() || to.is_some() {
                return Err(JsonPathError::RangeUnsupported(
                    "objects only take bare '[*]'",
                ));
            }
            Ok(map
                .iter()
                .map(|(k, v)| (ChildKey::Key(k.clone()), v))
                .collect())
        }
        _ => Err(JsonPathError::RangeUnsupported(
            "value is neither an array nor an object",
        )),
    }
}

/// Every direct child of an array or object. Scalars and null have no
/// children.
pub(crate) fn children(value: &Value) -> Vec<(ChildKey, &Value)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (ChildKey::Key(k.clone()), v))
            .collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| (ChildKey::Index(i), v))
            .collect(),
        _ => Vec::new(),
    }
}
