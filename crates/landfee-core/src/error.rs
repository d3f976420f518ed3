//! # Error Types — Tariff Error Taxonomy
//!
//! Every failure the engine can report is a [`TariffError`]. Errors are
//! raised synchronously at the point of detection and are never retried:
//! the computation is deterministic, so the same input always fails the
//! same way. No calculator ever returns a partially-built breakdown.
//!
//! ## Design
//!
//! - Request errors name the offending field so a form layer can attach
//!   the message to the right input.
//! - Table errors name the table and the index of the offending row.
//! - [`TariffError::disposition()`] tells callers how to surface an error
//!   without matching on every variant.

use thiserror::Error;

/// Top-level error type for the tariff engine.
#[derive(Error, Debug)]
pub enum TariffError {
    /// No zone in the registry matches the requested key or area.
    #[error("unknown zone: {0:?}")]
    UnknownZone(String),

    /// A field required by the selected survey kind is absent or non-positive.
    #[error("missing parameter: {field} is required and must be positive")]
    MissingParameter {
        /// Name of the request field.
        field: &'static str,
    },

    /// A field is present but not applicable or not consistent with the request.
    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter {
        /// Name of the request field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A computed amount does not fit the decimal range.
    #[error("amount out of range: the request is too large to price")]
    AmountOutOfRange,

    /// The survey kind is known but not offered yet.
    #[error("service unavailable: {0} fees are not offered yet")]
    ServiceUnavailable(String),

    /// An ordered range table is malformed (gap, overlap, inverted range,
    /// decreasing fee).
    #[error("invalid range table {table}: {reason}")]
    InvalidRange {
        /// Which table failed validation.
        table: String,
        /// The violated rule.
        reason: String,
    },

    /// A schedule is structurally invalid outside of its range tables.
    #[error("invalid tariff schedule: {0}")]
    InvalidSchedule(String),

    /// Canonicalization of a breakdown failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a caller is expected to present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDisposition {
    /// Show next to the offending form input.
    FormValidation,
    /// Show a "coming soon" notice.
    ComingSoon,
    /// Reference data is inconsistent; should never happen with valid inputs.
    DataIntegrity,
    /// Everything else.
    Internal,
}

impl TariffError {
    /// Classify the error for presentation.
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::MissingParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::AmountOutOfRange => ErrorDisposition::FormValidation,
            Self::ServiceUnavailable(_) => ErrorDisposition::ComingSoon,
            Self::UnknownZone(_) | Self::InvalidRange { .. } | Self::InvalidSchedule(_) => {
                ErrorDisposition::DataIntegrity
            }
            Self::Canonicalization(_) | Self::Serialization(_) | Self::Io(_) => {
                ErrorDisposition::Internal
            }
        }
    }

    /// Shorthand for an [`TariffError::InvalidParameter`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`TariffError::InvalidRange`].
    pub fn invalid_range(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// Error during canonical serialization of a breakdown.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer for amount: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_is_form_validation() {
        let err = TariffError::MissingParameter { field: "unit_count" };
        assert_eq!(err.disposition(), ErrorDisposition::FormValidation);
        assert_eq!(
            err.to_string(),
            "missing parameter: unit_count is required and must be positive"
        );
    }

    #[test]
    fn service_unavailable_is_coming_soon() {
        let err = TariffError::ServiceUnavailable("gazette".into());
        assert_eq!(err.disposition(), ErrorDisposition::ComingSoon);
        assert!(err.to_string().contains("gazette"));
    }

    #[test]
    fn unknown_zone_is_data_integrity() {
        let err = TariffError::UnknownZone("Z".into());
        assert_eq!(err.disposition(), ErrorDisposition::DataIntegrity);
        assert_eq!(err.to_string(), "unknown zone: \"Z\"");
    }

    #[test]
    fn invalid_range_names_table() {
        let err = TariffError::invalid_range("zone A", "gap between rows 1 and 2");
        assert_eq!(
            err.to_string(),
            "invalid range table zone A: gap between rows 1 and 2"
        );
        assert_eq!(err.disposition(), ErrorDisposition::DataIntegrity);
    }

    #[test]
    fn amount_out_of_range_is_form_validation() {
        let err = TariffError::AmountOutOfRange;
        assert_eq!(err.disposition(), ErrorDisposition::FormValidation);
        assert!(err.to_string().starts_with("amount out of range"));
    }

    #[test]
    fn io_is_internal() {
        let err = TariffError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(err.disposition(), ErrorDisposition::Internal);
    }
}
