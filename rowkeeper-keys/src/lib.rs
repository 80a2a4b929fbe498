//! Comparison keys for rowkeeper.
//!
//! Turning a live row into something sortable happens in three stages:
//!
//! 1. [`KeyExtractor`] / [`KeySource`] — pull display text out of the row,
//!    tolerating several incompatible host markup variants via an ordered
//!    fallback table.
//! 2. [`normalize_key`] — canonicalize the text: decorative glyphs removed,
//!    Unicode compatibility decomposition, whitespace collapsed, case folded.
//!    Pure and total; the empty string is a valid (and meaningful) key.
//! 3. [`compare_keys`] — natural ordering: numeric substrings compare by
//!    value ("item 2" before "item 10"), punctuation is insignificant,
//!    combining marks left by decomposition are insignificant.
//!
//! Ties must preserve input order. That is the *caller's* obligation: sort
//! with a stable algorithm (`slice::sort_by`), never `sort_unstable_by`.

mod compare;
mod extract;
mod normalize;

pub use compare::compare_keys;
pub use extract::{KeyExtractor, KeySource, TextSource};
pub use normalize::{normalize_key, strip_decorative};
