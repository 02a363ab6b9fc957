//! Explicit load state for a view.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Where a view's data load stands.
///
/// ```text
/// Idle ──begin──▶ Loading ──finish(Ok)──▶ Loaded
///                    │
///                    └──finish(Err)──▶ Failed
/// ```
///
/// `begin` may be called from any state; data already on screen rides along
/// as `previous` so a failed reload can still show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum LoadState<T> {
    /// Never loaded.
    Idle,
    /// A load is in flight.
    Loading {
        /// Data from the last successful load, if any.
        previous: Option<T>,
    },
    /// The last load succeeded.
    Loaded(T),
    /// The last load failed.
    Failed {
        /// Error message to show.
        error: String,
        /// Data from the last successful load, if any.
        previous: Option<T>,
    },
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    /// Enters `Loading`, keeping any displayable data.
    pub fn begin(&mut self) {
        let previous = std::mem::replace(self, Self::Idle).into_data();
        *self = Self::Loading { previous };
    }

    /// Leaves `Loading` with the outcome of the load.
    pub fn finish<E: Display>(&mut self, result: Result<T, E>) {
        let next = match result {
            Ok(data) => Self::Loaded(data),
            Err(err) => Self::Failed {
                error: err.to_string(),
                previous: std::mem::replace(self, Self::Idle).into_data(),
            },
        };
        *self = next;
    }

    /// Data to display: the loaded value, or the previous one while loading
    /// or after a failure.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Loaded(data) => Some(data),
            Self::Loading { previous } | Self::Failed { previous, .. } => previous.as_ref(),
        }
    }

    /// Error message of a failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Consumes the state, returning its displayable data.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Idle => None,
            Self::Loaded(data) => Some(data),
            Self::Loading { previous } | Self::Failed { previous, .. } => previous,
        }
    }
}
