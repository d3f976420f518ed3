//! # Zone Keys
//!
//! Newtype for the key of a tariff zone (`"A"`, `"B"`, ...). A zone key
//! addresses one fee schedule in the zone registry; it is distinct from the
//! administrative-area names that resolve *to* a key.
//!
//! ## Validation
//!
//! [`ZoneKey`] is trimmed and upper-cased at construction and must be
//! non-empty, so `" a "` and `"A"` address the same zone.

use serde::{Deserialize, Serialize};

use crate::error::TariffError;

impl<'de> Deserialize<'de> for ZoneKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Key of a tariff zone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ZoneKey(String);

impl ZoneKey {
    /// Create a zone key, normalising case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::UnknownZone`] if the key is empty or
    /// whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, TariffError> {
        let normalised = value.into().trim().to_uppercase();
        if normalised.is_empty() {
            return Err(TariffError::UnknownZone(normalised));
        }
        Ok(Self(normalised))
    }

    /// Create a key from built-in reference data.
    ///
    /// Normalises like [`ZoneKey::new()`] but cannot fail; registries
    /// reject an empty key when they are validated.
    pub fn from_static(value: &'static str) -> Self {
        Self(value.trim().to_uppercase())
    }

    /// Access the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ZoneKey {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
