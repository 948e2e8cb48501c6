//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Record errors
//! - 3xx: Config errors
//! - 4xx: Query errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for machine output.
///
/// Each variant maps to a numeric code (e.g., `RecordNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Record errors (1xx)
    // ========================================
    /// E101: No record with the requested id
    RecordNotFound,
    /// E102: Two records share one id
    RecordDuplicateId,
    /// E103: Record file parsed but its shape is wrong
    RecordSetInvalid,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Query errors (4xx)
    // ========================================
    /// E401: Criterion text could not be parsed
    CriterionInvalid,
    /// E402: No criterion with the requested id
    CriterionNotFound,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: File operation failed
    IoError,
    /// E605: Serialization/deserialization failed
    SerializationError,
    /// E606: File extension is not a supported record format
    UnsupportedFormat,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `RecordNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::RecordNotFound => 101,
            Self::RecordDuplicateId => 102,
            Self::RecordSetInvalid => 103,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::CriterionInvalid => 401,
            Self::CriterionNotFound => 402,

            Self::IoError => 601,
            Self::SerializationError => 605,
            Self::UnsupportedFormat => 606,

            Self::InternalError => 901,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::RecordNotFound => "Run `clinquery search` to list record ids in the current data set",
            Self::RecordDuplicateId => "Every record id must be unique. Fix the data file and retry",
            Self::RecordSetInvalid => "Records must be a list, or an object with a `records` list",

            Self::ConfigInvalid => "Run `clinquery config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the missing value in config.toml or via its CQ_* environment variable",

            Self::CriterionInvalid => "Write criteria as `field>=7.0`, `field<=160`, `field=2.1` or `field:60..90`",
            Self::CriterionNotFound => "Run `clinquery criteria <FILE> list` to see criterion ids",

            Self::IoError => "File operation failed. Check path exists and permissions are correct",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::UnsupportedFormat => "Use a .json, .yaml or .yml record file",

            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InternalError)
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "record",
            3 => "config",
            4 => "query",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::RecordNotFound,
            Self::RecordDuplicateId,
            Self::RecordSetInvalid,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::CriterionInvalid,
            Self::CriterionNotFound,
            Self::IoError,
            Self::SerializationError,
            Self::UnsupportedFormat,
            Self::InternalError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
