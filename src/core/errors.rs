//! DRP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, PickerError>;

/// Which text field a rejected entry came from, as named to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Start field of a range.
    First,
    /// End field of a range.
    Second,
    /// The only field of a single-date picker.
    Date,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Date => "date",
        };
        f.write_str(label)
    }
}

/// Top-level error type for the picker engine.
#[derive(Debug, Error)]
pub enum PickerError {
    #[error("[DRP-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DRP-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[DRP-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DRP-1101] invalid display pattern {pattern:?}: {details}")]
    InvalidPattern { pattern: String, details: String },

    #[error("[DRP-2001] invalid {endpoint} date input: {input:?}")]
    InvalidDateInput { endpoint: Endpoint, input: String },

    #[error("[DRP-2002] range spans {span_days} days, limit is {max_days}")]
    RangeTooLong { max_days: u32, span_days: i64 },

    #[error("[DRP-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DRP-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PickerError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DRP-1001",
            Self::MissingConfig { .. } => "DRP-1002",
            Self::ConfigParse { .. } => "DRP-1003",
            Self::InvalidPattern { .. } => "DRP-1101",
            Self::InvalidDateInput { .. } => "DRP-2001",
            Self::RangeTooLong { .. } => "DRP-2002",
            Self::Serialization { .. } => "DRP-2101",
            Self::Io { .. } => "DRP-3002",
        }
    }

    /// Whether the user can clear the failure by editing their input.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateInput { .. } | Self::RangeTooLong { .. }
        )
    }

    /// Text for the transient notification shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDateInput { endpoint, .. } => match endpoint {
                Endpoint::Date => "Please enter a valid date".to_string(),
                other => format!("Please enter a valid {other} date"),
            },
            Self::RangeTooLong { max_days, .. } => {
                format!("The selected range cannot exceed {max_days} days")
            }
            other => other.to_string(),
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for PickerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for PickerError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
