//! Shared types, errors, and configuration for the warehouse dashboard.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination requests for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, BackendConfig, DashboardConfig, ServerConfig};
pub use error::{AppError, AppResult};
