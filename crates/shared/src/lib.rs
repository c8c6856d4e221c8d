//! Shared types, errors, and configuration for Ledgertree.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency codes for report metadata
//! - Pagination types for report payloads
//! - Application-wide error types
//! - Configuration management and tracing setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::{AppConfig, LoggingConfig, ReconciliationPolicy, ReportConfig};
pub use error::{AppError, AppResult};
