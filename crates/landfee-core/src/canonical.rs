//! # Canonical Quote Bytes and Digests
//!
//! A quote handed to the payment or persistence collaborators is identified
//! by the SHA-256 digest of its canonical JSON form (RFC 8785 / JCS: sorted
//! keys, compact separators). Because calculators are deterministic, the
//! same request always yields the same digest, and a stored quote can be
//! checked against a recomputed one byte for byte.
//!
//! ## Invariants
//!
//! - [`CanonicalBytes::new()`] is the only constructor; the inner buffer is
//!   private.
//! - Floats are rejected. Amounts are `Decimal`, which serializes as a
//!   string, so a float in the tree means a non-money field leaked in.
//! - [`quote_digest()`] accepts only `&CanonicalBytes`, never raw bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// a non-integer number, or `SerializationFailed` if serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(items) => items.iter().try_for_each(reject_floats),
    }
}

/// SHA-256 digest identifying a computed quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteDigest(pub [u8; 32]);

impl QuoteDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for QuoteDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the digest of canonical bytes.
pub fn quote_digest(data: &CanonicalBytes) -> QuoteDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    QuoteDigest(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes_sorts_keys() {
        let data = serde_json::json!({"total": "10", "items": [], "currency": "NGN"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"currency":"NGN","items":[],"total":"10"}"#
        );
    }

    #[test]
    fn float_amount_rejected() {
        let data = serde_json::json!({"items": [{"amount": 1.5}]});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 1.5),
            other => panic!("expected FloatRejected, got: {other:?}"),
        }
    }

    #[test]
    fn integers_accepted() {
        let data = serde_json::json!({"quantity": 3});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"quantity":3}"#);
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 14);
    }

    #[test]
    fn digest_is_stable_and_hex() {
        let data = serde_json::json!({"a": "1"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let d1 = quote_digest(&cb);
        let d2 = quote_digest(&CanonicalBytes::new(&data).unwrap());
        assert_eq!(d1, d2);
        let hex = d1.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(d1.to_string().starts_with("sha256:"));
    }

    #[test]
    fn digest_of_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        // SHA-256 of "{}"
        assert_eq!(
            quote_digest(&cb).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn different_values_differ() {
        let a = CanonicalBytes::new(&serde_json::json!({"total": "1"})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"total": "2"})).unwrap();
        assert_ne!(quote_digest(&a), quote_digest(&b));
    }
}
