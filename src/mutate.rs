//! In-place mutation at concrete paths.
//!
//! A concrete path carries only `$`, `.key`, and `[index]` segments —
//! exactly the paths lookups emit. Deletion is two-phase: every doomed
//! leaf is overwritten with a null tombstone, then a single sweep drops
//! null object entries and re-packs arrays, so earlier marks never shift
//! the indices later marks rely on.

use serde_json::Value;
use tracing::debug;

use crate::error::JsonPathError;
use crate::lookup;
use crate::path::access::resolve_index;

/// One segment of a concrete path.
#[derive(Debug, Clone, PartialEq)]
enum PathPart {
    /// Object entry.
    Key(String),
    /// Array slot; negative counts from the end.
    Index(i64),
}

/// Split a concrete path into parts, consuming the leading `$`.
///
/// `$.user.tags[0]` → `[Key("user"), Key("tags"), Index(0)]`. The `$`
/// head may be followed directly by brackets (`$[0].test`), and a
/// segment may stack several (`$.grid[1][2]`). Anything that is not a
/// key or a signed-integer bracket is rejected.
fn parse_concrete(path: &str) -> Result<Vec<PathPart>, JsonPathError> {
    let invalid = || JsonPathError::InvalidConcretePath(path.to_string());
    let mut parts = Vec::new();

    for (position, segment) in path.split('.').enumerate() {
        let (head, indices) = split_brackets(segment).ok_or_else(invalid)?;
        if position == 0 {
            if head != "$" {
                return Err(invalid());
            }
        } else if head.is_empty() {
            if indices.is_empty() {
                return Err(invalid());
            }
        } else {
            parts.push(PathPart::Key(head.to_string()));
        }
        parts.extend(indices.into_iter().map(PathPart::Index));
    }

    if parts.is_empty() {
        return Err(invalid());
    }
    Ok(parts)
}

/// Split `key[i][j]...` into the key and its bracket indices; `None` for
/// malformed bracket groups.
fn split_brackets(segment: &str) -> Option<(&str, Vec<i64>)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };
    let head = &segment[..open];
    let mut indices = Vec::new();
    let mut rest = &segment[open..];
    while !rest.is_empty() {
        let (digits, tail) = rest.strip_prefix('[')?.split_once(']')?;
        indices.push(digits.parse::<i64>().ok()?);
        rest = tail;
    }
    Some((head, indices))
}

/// Replace the leaf at `path` with `value`.
///
/// Arrays are strict: a non-array under an index part or an out-of-range
/// index is an error. Objects are lenient: the final key is inserted or
/// overwritten, while a missing intermediate key leaves the document
/// untouched. No intermediate nodes are ever created.
pub fn set_at_path(doc: &mut Value, path: &str, value: Value) -> Result<(), JsonPathError> {
    let parts = parse_concrete(path)?;
    set_parts(doc, &parts, value)
}

fn set_parts(node: &mut Value, parts: &[PathPart], value: Value) -> Result<(), JsonPathError> {
    match &parts[0] {
        PathPart::Index(index) => {
            let Value::Array(arr) = node else {
                return Err(JsonPathError::NotAnArray);
            };
            let len = arr.len();
            let Some(slot) = resolve_index(*index, len) else {
                return Err(JsonPathError::IndexOutOfRange { len, index: *index });
            };
            if parts.len() == 1 {
                arr[slot] = value;
                Ok(())
            } else {
                set_parts(&mut arr[slot], &parts[1..], value)
            }
        }
        PathPart::Key(key) => {
            let Value::Object(map) = node else {
                return Ok(());
            };
            if parts.len() == 1 {
                map.insert(key.clone(), value);
                Ok(())
            } else {
                match map.get_mut(key) {
                    Some(child) => set_parts(child, &parts[1..], value),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Delete every node named by `paths`: mark each with a null tombstone,
/// then compact the whole tree once.
pub fn delete_at_paths<S: AsRef<str>>(doc: &mut Value, paths: &[S]) -> Result<(), JsonPathError> {
    for path in paths {
        let parts = parse_concrete(path.as_ref())?;
        mark_parts(doc, &parts);
    }
    debug!(marked = paths.len(), "compacting after delete batch");
    compact(doc);
    Ok(())
}

/// Delete every node matched by `expr`.
pub fn delete_by_query(doc: &mut Value, expr: &str) -> Result<(), JsonPathError> {
    let paths: Vec<String> = lookup(doc, expr)?.into_keys().collect();
    debug!(query = expr, matches = paths.len(), "deleting by query");
    delete_at_paths(doc, &paths)
}

/// Tombstone the leaf at `parts`. Unlike `set_parts` the walk is fully
/// lenient: a path that no longer resolves marks nothing.
fn mark_parts(node: &mut Value, parts: &[PathPart]) {
    match &parts[0] {
        PathPart::Index(index) => {
            let Value::Array(arr) = node else { return };
            let Some(slot) = resolve_index(*index, arr.len()) else {
                return;
            };
            if parts.len() == 1 {
                arr[slot] = Value::Null;
            } else {
                mark_parts(&mut arr[slot], &parts[1..]);
            }
        }
        PathPart::Key(key) => {
            let Value::Object(map) = node else { return };
            if let Some(child) = map.get_mut(key) {
                if parts.len() == 1 {
                    *child = Value::Null;
                } else {
                    mark_parts(child, &parts[1..]);
                }
            }
        }
    }
}

/// Sweep null tombstones: object entries bound to null are removed and
/// arrays are re-packed without their null slots.
fn compact(node: &mut Value) {
    match node {
        Value::Object(map) => {
            map.retain(|_, child| !child.is_null());
            for child in map.values_mut() {
                compact(child);
            }
        }
        Value::Array(arr) => {
            arr.retain(|child| !child.is_null());
            for child in arr.iter_mut() {
                compact(child);
            }
        }
        _ => {}
    }
}
