//! Batch key renames, rewritten one path level at a time.
//!
//! Rules are applied shallowest level first, and every rule's `from`
//! segments are rewritten in place as levels complete, so a rule
//! `$.a.b -> $.x.y` processed after `$.a -> $.x` still finds its source
//! under the already-renamed `$.x`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::JsonPathError;
use crate::lookup;
use crate::mutate::{delete_by_query, set_at_path};

/// One key rewrite: dot-separated paths of equal depth, both rooted at
/// `$`. The final segment of either side may carry a bracket suffix
/// (`$.arr[*].old`), which scopes the rename to the matching elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameRule {
    /// Path holding the keys to rename.
    pub from: String,
    /// Path with the replacement key names.
    pub to: String,
}

impl RenameRule {
    /// Convenience constructor for literal rules.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A rule split into segments; `from` is rewritten as levels complete.
struct ParsedRule {
    from: Vec<String>,
    to: Vec<String>,
}

impl ParsedRule {
    fn parse(rule: &RenameRule) -> Result<Self, JsonPathError> {
        let from: Vec<String> = rule.from.split('.').map(str::to_string).collect();
        let to: Vec<String> = rule.to.split('.').map(str::to_string).collect();
        if from.first().map(String::as_str) != Some("$")
            || to.first().map(String::as_str) != Some("$")
        {
            return Err(JsonPathError::InvalidRenameRule(format!(
                "'{}' -> '{}': both paths must start at '$'",
                rule.from, rule.to
            )));
        }
        if from.len() != to.len() {
            return Err(JsonPathError::InvalidRenameRule(format!(
                "'{}' -> '{}': segment counts differ",
                rule.from, rule.to
            )));
        }
        Ok(Self { from, to })
    }

    /// Number of levels below the root.
    fn depth(&self) -> usize {
        self.from.len() - 1
    }

    /// The `from`/`to` prefixes covering levels `0..=level`, or `None`
    /// once the rule is exhausted.
    fn prefixes(&self, level: usize) -> Option<(String, String)> {
        if level >= self.depth() {
            return None;
        }
        Some((
            self.from[..level + 2].join("."),
            self.to[..level + 2].join("."),
        ))
    }
}

/// Apply `rules` to `doc`.
///
/// Levels run shallowest first; within a level, rules run in input
/// order. Each level keeps a map of prefixes it has already renamed so
/// overlapping rules collapse instead of renaming twice.
pub fn rename(doc: &mut Value, rules: &[RenameRule]) -> Result<(), JsonPathError> {
    let mut parsed = rules
        .iter()
        .map(ParsedRule::parse)
        .collect::<Result<Vec<_>, _>>()?;
    let max_depth = parsed.iter().map(ParsedRule::depth).max().unwrap_or(0);

    for level in 0..max_depth {
        debug!(level, rules = parsed.len(), "applying rename level");
        let mut renamed: HashMap<String, String> = HashMap::new();
        for rule in &mut parsed {
            rename_at_level(doc, rule, level, &mut renamed)?;
        }
    }
    Ok(())
}

fn rename_at_level(
    doc: &mut Value,
    rule: &mut ParsedRule,
    level: usize,
    renamed: &mut HashMap<String, String>,
) -> Result<(), JsonPathError> {
    let Some((from, to)) = rule.prefixes(level) else {
        return Ok(());
    };

    // Another rule already renamed this prefix at this level; just follow.
    if renamed.contains_key(&from) {
        rule.from[level + 1] = rule.to[level + 1].clone();
        return Ok(());
    }

    let do_from = strip_bracket_suffix(&from);
    let do_to = strip_bracket_suffix(&to);
    if do_from == do_to {
        return Ok(());
    }

    // Collect owned values first; the moves below mutate the document.
    let moves: Vec<(String, Value)> = lookup(doc, &do_from)?
        .into_iter()
        .map(|(path, value)| (path, value.clone()))
        .collect();
    let new_leaf = tail_segment(&do_to);
    for (path, value) in moves {
        let destination = format!("{}.{new_leaf}", trim_tail_segment(&path));
        set_at_path(doc, &destination, value)?;
    }
    delete_by_query(doc, &do_from)?;

    rule.from[level + 1] = rule.to[level + 1].clone();
    renamed.insert(from, to);
    Ok(())
}

/// Drop any bracket suffix from the final segment: `$.arr[*].old[2]`
/// becomes `$.arr[*].old`.
fn strip_bracket_suffix(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((head, tail)) => format!("{head}.{}", before_bracket(tail)),
        None => before_bracket(path).to_string(),
    }
}

fn before_bracket(segment: &str) -> &str {
    match segment.find('[') {
        Some(open) => &segment[..open],
        None => segment,
    }
}

fn tail_segment(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((_, tail)) => tail,
        None => path,
    }
}

fn trim_tail_segment(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((head, _)) => head,
        None => path,
    }
}
