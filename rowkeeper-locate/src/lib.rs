//! Container and row discovery for rowkeeper.
//!
//! The host owns the document and restructures it freely; discovery must
//! tolerate whole markup generations coming and going. A [`RowLocator`]
//! tries an ordered table of [`ListRule`]s — a container signature plus a
//! row signature — and accepts the first container that holds at least one
//! visible row. Not finding anything is `None`, meaning "try again later",
//! never an error.
//!
//! The last-found container is cached inside a short validity window so
//! callers can re-locate on every event without rescanning the document,
//! but a cache entry is only trusted after re-checking the node is still
//! attached: a detached cached container is a silent wrong-answer bug, not
//! a performance optimization.

mod locator;
mod rules;

pub use locator::{Located, RowLocator};
pub use rules::{default_rules, header_markers, ListRule};
