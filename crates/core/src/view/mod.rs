//! Presentation view models: tabs, their payloads, and load state.

pub mod data;
pub mod state;
pub mod tab;

pub use data::{OverviewData, TabData};
pub use state::LoadState;
pub use tab::{Tab, ViewError};
