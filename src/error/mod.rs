//! Error handling for clinquery.
//!
//! The query engine itself never fails: malformed or missing data only
//! excludes records. The errors here belong to the layers around it
//! (loading record files, reading config, parsing criterion text).
//!
//! This module provides:
//! - [`CqError`]: The main error enum
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for clinquery operations.
#[derive(Error, Debug)]
pub enum CqError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Duplicate record id: {0}")]
    DuplicateRecordId(String),

    #[error("Invalid record set: {0}")]
    InvalidRecordSet(String),

    #[error("Invalid criterion '{spec}': {reason}")]
    InvalidCriterion { spec: String, reason: String },

    #[error("Criterion not found: {0}")]
    CriterionNotFound(String),

    #[error("Unsupported record format: {0}")]
    UnsupportedFormat(String),
}

impl CqError {
    /// Shorthand for [`CqError::InvalidCriterion`].
    pub fn invalid_criterion(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCriterion {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) => ErrorCode::SerializationError,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::RecordNotFound(_) => ErrorCode::RecordNotFound,
            Self::DuplicateRecordId(_) => ErrorCode::RecordDuplicateId,
            Self::InvalidRecordSet(_) => ErrorCode::RecordSetInvalid,
            Self::InvalidCriterion { .. } => ErrorCode::CriterionInvalid,
            Self::CriterionNotFound(_) => ErrorCode::CriterionNotFound,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::RecordNotFound(id) | Self::DuplicateRecordId(id) => {
                Some(serde_json::json!({ "record_id": id }))
            }
            Self::InvalidCriterion { spec, reason } => {
                Some(serde_json::json!({ "spec": spec, "reason": reason }))
            }
            Self::CriterionNotFound(id) => Some(serde_json::json!({ "criterion_id": id })),
            Self::UnsupportedFormat(path) => Some(serde_json::json!({ "path": path })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_cq_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "RECORD_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "record", "config", "query")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a [`CqError`].
    #[must_use]
    pub fn from_cq_error(err: &CqError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error, regenerating the suggestion.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&CqError> for StructuredError {
    fn from(err: &CqError) -> Self {
        Self::from_cq_error(err)
    }
}

/// Result type alias using [`CqError`].
pub type Result<T> = std::result::Result<T, CqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            CqError::RecordNotFound("001234".into()).code(),
            ErrorCode::RecordNotFound
        );
        assert_eq!(CqError::Config("bad".into()).code(), ErrorCode::ConfigInvalid);
        assert_eq!(
            CqError::invalid_criterion("x", "y").code(),
            ErrorCode::CriterionInvalid
        );
    }

    #[test]
    fn test_error_context() {
        let err = CqError::RecordNotFound("001234".into());
        let ctx = err.context().unwrap();
        assert_eq!(ctx.get("record_id").unwrap(), "001234");
    }

    #[test]
    fn test_structured_error_from_cq_error() {
        let err = CqError::RecordNotFound("009999".into());
        let structured = err.to_structured();

        assert_eq!(structured.code, ErrorCode::RecordNotFound);
        assert_eq!(structured.numeric_code, 101);
        assert!(structured.message.contains("009999"));
        assert!(structured.suggestion.contains("009999"));
        assert!(structured.recoverable);
        assert_eq!(structured.category, "record");
    }

    #[test]
    fn test_structured_error_serialization() {
        let err = StructuredError::new(ErrorCode::CriterionInvalid, "bad criterion");
        let json = serde_json::to_string(&err).unwrap();

        assert!(json.contains("CRITERION_INVALID"));
        assert!(json.contains("\"numeric_code\":401"));
        assert!(json.contains("\"category\":\"query\""));
        assert!(!json.contains("\"context\""));
    }

    #[test]
    fn test_structured_error_with_context() {
        let err = StructuredError::new(ErrorCode::RecordNotFound, "Not found")
            .with_context(serde_json::json!({ "record_id": "001240" }));
        assert!(err.suggestion.contains("001240"));
    }

    #[test]
    fn test_structured_error_display() {
        let err = StructuredError::new(ErrorCode::RecordNotFound, "Record 'x' not found");
        let display = err.to_string();
        assert!(display.contains("E101"));
        assert!(display.contains("Record 'x'"));
    }
}
