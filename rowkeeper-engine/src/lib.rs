//! The rowkeeper sort/reset engine.
//!
//! Everything here mutates the host document *in place*: rows are the same
//! live nodes before and after, merely relocated. Recreating nodes would
//! drop host-attached listeners and state and break event delegation, so the
//! engine never clones or rebuilds a row.
//!
//! - [`OrderLedger`] — tags each row with its position at first observation,
//!   as an attribute on the row itself, so the pristine order can be
//!   restored later. Tags live and die with the host's elements.
//! - [`RowSorter`] — applies ascending/descending/original order via stable
//!   sort and reinsertion. All writes are expected to run inside the
//!   reconciler's suppression window; the engine itself does not debounce
//!   or observe anything.
//! - [`LabelFilter`] — the visibility partition: rows carrying a hidden
//!   label are hidden, the rest shown, re-applied after host churn the same
//!   way an active ordering is.

mod ledger;
mod partition;
mod sorter;

pub use ledger::{OrderLedger, ORIGIN_ATTR};
pub use partition::{LabelFilter, PartitionOutcome, HIDDEN_CLASS};
pub use sorter::{ResetOutcome, RowSorter, SortOutcome};
