//! Sort directions and the per-instance enforcement mode.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A requested ordering over the row list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// A → Z by comparison key.
    Ascending,
    /// Z → A by comparison key.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(Error::InvalidDirection(other.to_string())),
        }
    }
}

/// The ordering policy a reconciler instance is currently enforcing.
///
/// Set by explicit user action, consumed by the mutation reconciler to decide
/// whether host-driven changes warrant a re-application. Reset to `None` only
/// by an explicit Reset or toggle-off; never persisted across page loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveMode {
    /// No ordering enforced; host mutations are observed but ignored.
    #[default]
    None,
    /// Ascending order is enforced across host re-renders.
    Ascending,
    /// Descending order is enforced across host re-renders.
    Descending,
}

impl ActiveMode {
    /// The direction this mode enforces, if any.
    #[must_use]
    pub fn direction(self) -> Option<SortDirection> {
        match self {
            Self::None => None,
            Self::Ascending => Some(SortDirection::Ascending),
            Self::Descending => Some(SortDirection::Descending),
        }
    }

    /// Returns true when an ordering is being enforced.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<SortDirection> for ActiveMode {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => Self::Ascending,
            SortDirection::Descending => Self::Descending,
        }
    }
}

impl fmt::Display for ActiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}
