//! Degradation taxonomy for typed settings reads.
//!
//! None of these ever reach a caller of the store: they are produced by the
//! value parsers, logged, and turned into a fallback value.

use thiserror::Error;

use super::value::ValueKind;

/// Reasons a stored value could not be used as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Key absent from the document; the declared default is used
    #[error("missing key [{section}] {key}")]
    MissingKey { section: String, key: String },

    /// Stored text does not parse as the declared type
    #[error("malformed {kind} value {raw:?}")]
    MalformedValue { kind: ValueKind, raw: String },

    /// Parsed value lies outside its declared bounds and was clamped
    #[error("value {value} outside [{min}, {max}]")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },
}

impl ConfigError {
    /// Create a malformed value error
    pub fn malformed<R: Into<String>>(kind: ValueKind, raw: R) -> Self {
        Self::MalformedValue {
            kind,
            raw: raw.into(),
        }
    }

    /// Create a missing key error
    pub fn missing<S: Into<String>, K: Into<String>>(section: S, key: K) -> Self {
        Self::MissingKey {
            section: section.into(),
            key: key.into(),
        }
    }
}
