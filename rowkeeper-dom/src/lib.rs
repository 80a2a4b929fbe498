//! In-memory host document model for rowkeeper.
//!
//! The core maintains an ordering over rows it does not own: the host
//! document creates, destroys, and repaints them at will. This crate models
//! that boundary as an explicit document value:
//!
//! - [`Document`] — an arena of element nodes with browser-like structural
//!   semantics: appending an attached node *moves* it (identity and
//!   attributes preserved), text content concatenates the subtree, and
//!   visibility is inherited from ancestors.
//! - [`Matcher`] / [`MatcherPath`] — data-driven structural predicates, the
//!   pluggable stand-in for host-specific selector strings. Fallback chains
//!   are tables of matchers tried in order, so new host markup variants are
//!   additive.
//! - [`MutationRecord`] — a drainable journal of structural changes, the
//!   stand-in for a child-list mutation observer stream. Consumers must
//!   treat a drain as a batch: one record does not mean one discrete host
//!   change.
//!
//! A real embedding substitutes the browser DOM at exactly this seam; every
//! other rowkeeper crate is written against this model only.

mod document;
mod matcher;
mod mutation;

pub use document::{Document, NodeId};
pub use matcher::{AttrRule, Matcher, MatcherPath};
pub use mutation::MutationRecord;
