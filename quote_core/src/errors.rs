//! # Error Types
//!
//! Structured error types for quote_core. Every failure path returns one of
//! these to the caller; nothing here is fatal to the process.
//!
//! The variants fall into three classes:
//!
//! - **Validation** (`MissingField`, `Validation`) - operator input is
//!   incomplete or out of range; raised before any store or engine call.
//! - **Not found** (`NotFound`) - a stale project or measurement id.
//! - **Persistence** (`Persistence`, `StoreLocked`, `Serialization`) - the
//!   storage medium could not be read or written.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn validate_width(width_inches: f64) -> QuoteResult<()> {
//!     if width_inches <= 0.0 {
//!         return Err(QuoteError::validation(
//!             "widthInches",
//!             width_inches.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(-1.0).unwrap_err().is_validation());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for store, engine and rendering operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// A supplied value is out of range or malformed
    #[error("Invalid value for '{field}': {value} - {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A project or measurement id does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The storage medium could not be read or written
    #[error("Storage error: {operation} on '{target}' - {reason}")]
    Persistence {
        operation: String,
        target: String,
        reason: String,
    },

    /// Another process holds the store lock
    #[error("Store locked: '{path}' is locked by {locked_by} since {locked_at}")]
    StoreLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// Stored data is not valid JSON for the expected shape
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Quotation document could not be produced
    #[error("Render error: {reason}")]
    Render { reason: String },
}

impl QuoteError {
    /// Create a Validation error
    pub fn validation(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::Validation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        QuoteError::MissingField {
            field: field.into(),
        }
    }

    /// Create a NotFound error for a project id
    pub fn project_not_found(id: impl ToString) -> Self {
        QuoteError::NotFound {
            entity: "Project".to_string(),
            id: id.to_string(),
        }
    }

    /// Create a NotFound error for a measurement id
    pub fn measurement_not_found(id: impl ToString) -> Self {
        QuoteError::NotFound {
            entity: "Measurement".to_string(),
            id: id.to_string(),
        }
    }

    /// Create a Persistence error
    pub fn persistence(operation: impl Into<String>, target: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::Persistence {
            operation: operation.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a StoreLocked error
    pub fn store_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        QuoteError::StoreLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// True for errors the operator should fix in the form before retrying
    pub fn is_validation(&self) -> bool {
        matches!(self, QuoteError::Validation { .. } | QuoteError::MissingField { .. })
    }

    /// True when the id referenced no longer exists
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuoteError::NotFound { .. })
    }

    /// Check if this is a recoverable error (the same operation may be retried)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuoteError::Persistence { .. } | QuoteError::StoreLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::Validation { .. } => "VALIDATION_ERROR",
            QuoteError::MissingField { .. } => "MISSING_FIELD",
            QuoteError::NotFound { .. } => "NOT_FOUND",
            QuoteError::Persistence { .. } => "PERSISTENCE_ERROR",
            QuoteError::StoreLocked { .. } => "STORE_LOCKED",
            QuoteError::Serialization { .. } => "SERIALIZATION_ERROR",
            QuoteError::Render { .. } => "RENDER_ERROR",
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::Serialization {
            reason: e.to_string(),
        }
    }
}
