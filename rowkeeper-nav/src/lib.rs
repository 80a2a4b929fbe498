//! Navigation interception for rowkeeper.
//!
//! The embedding registers one capture-phase listener at the document level
//! and forwards every pointer/keyboard event here as an [`InputEvent`]. The
//! [`NavigationInterceptor`] classifies it — stateless, resolved fresh from
//! the event target at dispatch time, so it stays correct as rows are
//! destroyed and recreated around it — and answers with a [`Verdict`]:
//!
//! - clicks on embedded row controls (checkboxes, stars, quick actions,
//!   anything whose accessible name speaks the action vocabulary) and
//!   context menus pass through to the host untouched;
//! - pointer down/up inside a row is swallowed so the host's drag/selection
//!   handlers never engage;
//! - a plain click (or Enter) on the row navigates: preferably to a deep
//!   link synthesized from the row's stable item identifier via
//!   [`DeepLinkScheme`], else to the row's first anchor, else — when no URL
//!   can be resolved — the event is left alone. A click is never blocked
//!   without a navigation to replace it.

mod deeplink;
mod input;
mod interceptor;

pub use deeplink::DeepLinkScheme;
pub use input::{InputEvent, Modifiers, MouseButton};
pub use interceptor::{NavigationInterceptor, Verdict};
