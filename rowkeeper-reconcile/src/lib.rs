//! The mutation reconciler.
//!
//! The host repaints its list whenever it likes; an active ordering has to
//! be re-imposed after every repaint without ever reacting to the engine's
//! own writes. The split here mirrors that tension:
//!
//! - [`Reconciler`] is a pure state machine. It consumes [`Event`]s (host
//!   mutation batches, timer firings, visibility changes, container identity
//!   reports, user actions) with an explicit clock reading, and produces
//!   [`Command`]s (watch/unwatch, timer arm/cancel, engine calls). It never
//!   touches the document, the clock, or a timer itself, which makes every
//!   scheduling decision deterministic and testable.
//! - [`ReconcileDriver`] is the orchestrator: it owns the document handle,
//!   executes commands against the sort engine, runs the timers, feeds
//!   engine-caused mutations straight back into the machine (where the
//!   suppression window discards them), and polls container identity.
//!
//! Scheduled re-sorts coalesce — arming a timer kind replaces any pending
//! deadline of that kind — so a burst of N host mutations yields one
//! re-sort, not N. Sort is idempotent and depends only on present document
//! state, which is what makes the coalescing sound.

mod command;
mod driver;
mod error;
mod event;
mod reconciler;

pub use command::{Command, TimerKind};
pub use driver::{DriverClient, ReconcileDriver};
pub use error::{ReconcileError, ReconcileResult};
pub use event::{Event, UserAction};
pub use reconciler::Reconciler;
