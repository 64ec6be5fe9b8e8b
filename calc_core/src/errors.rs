//! # Error Types
//!
//! Structured error types for calc_core. Every variant carries enough
//! context for a UI shell to tell the user which field, column, or
//! quantity caused the problem.
//!
//! Corbels whose geometry falls outside every classification band are
//! *not* errors; see [`crate::calculations::corbel::CorbelClassification`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(max_height: u32) -> CalcResult<()> {
//!     if max_height == 0 {
//!         return Err(CalcError::invalid_input(
//!             "max_height",
//!             max_height.to_string(),
//!             "Stack height must be at least one unit",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unparseable, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field or table column is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Construction system not present in the comparison matrix
    #[error("System not found: {name}")]
    SystemNotFound { name: String },

    /// Geometry or loading makes the corbel formulas degenerate
    #[error("Invalid geometry: {quantity} = {value} - {reason}")]
    InvalidGeometry {
        quantity: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Session schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a SystemNotFound error
    pub fn system_not_found(name: impl Into<String>) -> Self {
        CalcError::SystemNotFound { name: name.into() }
    }

    /// Create an InvalidGeometry error for a degenerate intermediate value
    pub fn invalid_geometry(quantity: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            quantity: quantity.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::SystemNotFound { .. } => "SYSTEM_NOT_FOUND",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_geometry("Vrd", 0.0, "Strut capacity must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidGeometry\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("NEd_kN").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::system_not_found("Igloo").error_code(), "SYSTEM_NOT_FOUND");
        assert_eq!(CalcError::invalid_geometry("z0", 0.0, "zero").error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_missing_column_message_names_column() {
        let error = CalcError::missing_field("cover_mm");
        assert_eq!(error.to_string(), "Missing required field: cover_mm");
    }
}
