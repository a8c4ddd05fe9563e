#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! # jpath
//!
//! JSONPath-style query and in-place mutation for [`serde_json::Value`]
//! documents.
//!
//! Supported query syntax:
//! - `$.store.book` — child access (`$` root, `@` current inside filters)
//! - `$.store.book[0]`, `[-1]`, `[0,1]` — index lists, negative from the end
//! - `$.store.book[0:1]` — inclusive range; either bound may be blank
//! - `$.store.book[*]`, `$.store.*` — all children
//! - `$..price` — recursive descent
//! - `$.store.book[?(@.price > $.expensive)]` — filters with `<`, `<=`,
//!   `==`, `>=`, `>`, `=~ /regex/`, or bare existence; single quotes
//!   protect spaces in literals
//!
//! Lookups return a map from concrete path (`$.store.book[2].isbn`) to
//! the matched value. Those concrete paths feed the mutation half of the
//! crate: [`set_at_path`], [`delete_at_paths`], [`delete_by_query`], and
//! batch [`rename`].
//!
//! ```
//! use serde_json::json;
//!
//! let mut doc = json!({"store": {"book": [
//!     {"title": "Sayings of the Century", "price": 8.95},
//!     {"title": "Sword of Honour", "price": 12.99},
//! ]}});
//!
//! let cheap = jpath::lookup(&doc, "$.store.book[?(@.price < 10)].title").unwrap();
//! assert_eq!(cheap["$.store.book[0].title"], &json!("Sayings of the Century"));
//!
//! jpath::delete_by_query(&mut doc, "$.store.book[?(@.price < 10)]").unwrap();
//! assert_eq!(doc["store"]["book"].as_array().unwrap().len(), 1);
//! ```

mod error;
mod mutate;
mod path;
mod rename;
mod template;

pub use error::JsonPathError;
pub use mutate::{delete_at_paths, delete_by_query, set_at_path};
pub use path::{CompiledPath, MatchSet};
pub use rename::{rename, RenameRule};
pub use template::parse_json_template;

use serde_json::Value;

/// One-shot lookup: compile `expr` and evaluate it against `doc`.
///
/// Compiles a fresh plan per call; compile once via
/// [`CompiledPath::compile`] and reuse it when the same expression runs
/// against many documents.
pub fn lookup<'a>(doc: &'a Value, expr: &str) -> Result<MatchSet<'a>, JsonPathError> {
    CompiledPath::compile(expr)?.lookup(doc)
}
