//! Input event types forwarded by the embedding.

use rowkeeper_dom::NodeId;
use serde::{Deserialize, Serialize};

/// Which mouse button an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Primary,
    /// Middle button — opens in a new tab when navigating.
    Auxiliary,
    Secondary,
}

/// Modifier keys held during the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// The platform open-in-new-tab chord (ctrl, or command on mac).
    #[must_use]
    pub fn requests_new_tab(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// One captured input event, scoped to its target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        target: NodeId,
        button: MouseButton,
        modifiers: Modifiers,
    },
    PointerUp {
        target: NodeId,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Click {
        target: NodeId,
        button: MouseButton,
        modifiers: Modifiers,
    },
    ContextMenu {
        target: NodeId,
    },
    /// Enter pressed with the target focused.
    KeyEnter {
        target: NodeId,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// The element the event was dispatched on.
    #[must_use]
    pub fn target(&self) -> NodeId {
        match *self {
            Self::PointerDown { target, .. }
            | Self::PointerUp { target, .. }
            | Self::Click { target, .. }
            | Self::ContextMenu { target }
            | Self::KeyEnter { target, .. } => target,
        }
    }
}
