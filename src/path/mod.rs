//! Path compilation and evaluation.
//!
//! An expression is tokenised into coarse segments, each segment parsed
//! into a typed `Step`, and the steps folded over the document while the
//! concrete path of every surviving match is tracked.

pub(crate) mod access;
pub(crate) mod eval;
pub(crate) mod filter;
pub(crate) mod step;
pub(crate) mod tokenize;

pub use eval::{CompiledPath, MatchSet};
