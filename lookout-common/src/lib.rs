//! Common types and utilities shared across Lookout crates.
//!
//! This crate defines the shared error type and observability helpers used
//! throughout the Lookout workspace. It is intentionally lightweight so that
//! every crate can depend on it without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`LookoutError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use lookout_common::LookoutError;
//!
//! let err = LookoutError::Request("server returned error 403".into());
//! assert_eq!(err.to_string(), "request error: server returned error 403");
//! ```

pub mod observability;

/// Error types used across the Lookout system.
#[derive(thiserror::Error, Debug)]
pub enum LookoutError {
    /// The user supplied a query that cannot be sent.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The search request exceeded its timeout.
    #[error("request timed out")]
    Timeout,

    /// The search request failed (network, HTTP status, or decoding).
    #[error("request error: {0}")]
    Request(String),

    /// The external viewer could not be launched.
    #[error("viewer error: {0}")]
    Viewer(String),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`LookoutError`].
pub type Result<T> = std::result::Result<T, LookoutError>;
