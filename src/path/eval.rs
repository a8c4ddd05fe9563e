//! Compiled paths and the match-set evaluation engine.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::JsonPathError;
use crate::path::access::{children, index_of, key_of, range_of};
use crate::path::filter::Predicate;
use crate::path::step::Step;
use crate::path::tokenize::tokenize;

/// The result of one evaluation: concrete path → matched value.
///
/// Keys are concrete paths rooted at `$` (`$.store.book[2].isbn`); values
/// borrow from the evaluated document. Two traversals reaching the same
/// path collapse to one entry. Iteration order carries no meaning.
pub type MatchSet<'a> = BTreeMap<String, &'a Value>;

/// A compiled path expression: the source string and its parsed steps.
///
/// Compilation is pure. A plan carries no evaluation state, so it can be
/// reused across documents and shared between threads.
#[derive(Debug, Clone)]
pub struct CompiledPath {
    source: String,
    steps: Vec<Step>,
}

impl CompiledPath {
    /// Tokenise and parse `expr` into a reusable plan.
    pub fn compile(expr: &str) -> Result<Self, JsonPathError> {
        let steps = tokenize(expr)?
            .iter()
            .map(|token| Step::parse(token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: expr.to_string(),
            steps,
        })
    }

    /// The expression this plan was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate the plan against `root`.
    pub fn lookup<'a>(&self, root: &'a Value) -> Result<MatchSet<'a>, JsonPathError> {
        let mut state = EvalState::new(root);
        for step in &self.steps {
            state.apply(step)?;
        }
        Ok(state.matches)
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compiled lookup: {}", self.source)
    }
}

/// Per-evaluation state: the working match set and the document root for
/// `$.`-sided filter predicates.
struct EvalState<'a> {
    root: &'a Value,
    matches: MatchSet<'a>,
}

impl<'a> EvalState<'a> {
    fn new(root: &'a Value) -> Self {
        let mut matches = MatchSet::new();
        matches.insert("$".to_string(), root);
        Self { root, matches }
    }

    fn apply(&mut self, step: &Step) -> Result<(), JsonPathError> {
        match step {
            Step::Root => Ok(()),
            Step::Key(key) => {
                self.apply_key(key);
                Ok(())
            }
            Step::Indices { key, indices } => self.apply_indices(key, indices),
            Step::Range { key, from, to } => self.apply_range(key, *from, *to),
            Step::Filter { key, predicate } => {
                if !key.is_empty() {
                    self.apply_key(key);
                }
                self.apply_predicate(predicate)
            }
            Step::Scan => {
                self.apply_scan();
                Ok(())
            }
            Step::ScanFilter { predicate } => {
                self.apply_scan();
                self.apply_predicate(predicate)
            }
        }
    }

    /// Child access: candidates without the key are dropped silently.
    fn apply_key(&mut self, key: &str) {
        let mut next = MatchSet::new();
        for (path, &value) in &self.matches {
            if let Some(child) = key_of(value, key) {
                next.insert(format!("{path}.{key}"), child);
            }
        }
        self.matches = next;
    }

    /// Explicit index list: strict, an out-of-range index aborts the
    /// query. The emitted path keeps the index as written.
    fn apply_indices(&mut self, key: &str, indices: &[i64]) -> Result<(), JsonPathError> {
        if !key.is_empty() {
            self.apply_key(key);
        }
        let mut next = MatchSet::new();
        for (path, &value) in &self.matches {
            for &index in indices {
                let child = index_of(value, index)?;
                next.insert(format!("{path}[{index}]"), child);
            }
        }
        self.matches = next;
        Ok(())
    }

    fn apply_range(
        &mut self,
        key: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<(), JsonPathError> {
        if !key.is_empty() {
            self.apply_key(key);
        }
        let mut next = MatchSet::new();
        for (path, &value) in &self.matches {
            for (child_key, child) in range_of(value, from, to)? {
                next.insert(format!("{path}{}", child_key.suffix()), child);
            }
        }
        self.matches = next;
        Ok(())
    }

    /// One level of expansion: every match is replaced by its direct
    /// children. Scalars and null fall away.
    fn apply_scan(&mut self) {
        let mut next = MatchSet::new();
        for (path, &value) in &self.matches {
            for (child_key, child) in children(value) {
                next.insert(format!("{path}{}", child_key.suffix()), child);
            }
        }
        self.matches = next;
    }

    /// Keep the children of every match satisfying the predicate.
    fn apply_predicate(&mut self, predicate: &str) -> Result<(), JsonPathError> {
        let predicate = Predicate::parse(predicate)?;
        let mut next = MatchSet::new();
        for (path, &value) in &self.matches {
            for (child_key, child) in children(value) {
                if predicate.matches(child, self.root)? {
                    next.insert(format!("{path}{}", child_key.suffix()), child);
                }
            }
        }
        self.matches = next;
        Ok(())
    }
}
