//! Unified error types for `PantryLedger`.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map
//! the failure taxonomy of the pipeline: payload validation, normalizer
//! output, authorization, and store-level failures.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request payload, rejected before any store access.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the payload
        message: String,
    },

    /// Missing or unverifiable caller identity, rejected before any store access.
    #[error("Unauthorized: {message}")]
    Auth {
        /// Why the caller was rejected
        message: String,
    },

    /// The LLM normalizer returned null, a non-array, or malformed items.
    #[error("Normalization failure: {message}")]
    Normalization {
        /// What was wrong with the normalizer output
        message: String,
    },

    /// A quantity that is not finite or not positive.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: f64,
    },

    /// A pantry edit that would take the stored quantity below zero.
    #[error("Insufficient quantity: have {current}, tried to remove {requested}")]
    InsufficientQuantity {
        /// Quantity currently in the pantry
        current: f64,
        /// Quantity the caller tried to remove
        requested: f64,
    },

    /// No pantry item exists at the given key.
    #[error("Pantry item not found: {key}")]
    ItemNotFound {
        /// The item identity key that was looked up
        key: String,
    },

    /// Configuration error (missing or malformed config file / variable).
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Underlying store failure; the surrounding transaction is rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
