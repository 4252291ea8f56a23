//! Opaque continuation tokens for List operations.
//!
//! A token carries a position cursor (the canonical name of the last row
//! the previous page consumed) rather than a numeric offset, so enumeration
//! survives inserts and deletes between pages. It also carries a
//! fingerprint of the request shape (kind, parent pattern, filter, page
//! size); resuming with a different shape would silently skip or repeat
//! results, so a fingerprint mismatch is rejected instead. Tokens that were
//! not produced by this encoder fail to decode and are rejected the same
//! way.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use atlas_core::error::{Error, Result};
use atlas_core::names::Kind;

/// Wire-format version of the token envelope.
const TOKEN_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    v: u32,
    cursor: String,
    fp: String,
}

/// A decoded continuation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    /// Canonical name of the last row consumed by the previous page; the
    /// next page scans strictly after it.
    pub cursor: String,
    fingerprint: String,
}

/// Fingerprint of a List request's shape. Two requests with the same
/// fingerprint enumerate the same sequence.
#[must_use]
pub fn fingerprint(kind: Kind, parent_pattern: &str, filter: &str, page_size: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.keyspace().as_bytes());
    hasher.update([0]);
    hasher.update(parent_pattern.as_bytes());
    hasher.update([0]);
    hasher.update(filter.as_bytes());
    hasher.update([0]);
    hasher.update(page_size.to_be_bytes());
    hex::encode(hasher.finalize())
}

impl PageToken {
    /// Creates a token resuming after `cursor` for a request with the given
    /// fingerprint.
    #[must_use]
    pub fn new(cursor: String, fingerprint: String) -> Self {
        Self {
            cursor,
            fingerprint,
        }
    }

    /// Encodes the token into its opaque wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        let envelope = Envelope {
            v: TOKEN_VERSION,
            cursor: self.cursor.clone(),
            fp: self.fingerprint.clone(),
        };
        let json = serde_json::to_vec(&envelope).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes an opaque token, verifying it was produced by this encoder
    /// for a request with `expected_fingerprint`.
    pub fn decode(token: &str, expected_fingerprint: &str) -> Result<Self> {
        let invalid = || Error::invalid_argument("invalid page token");
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|_| invalid())?;
        if envelope.v != TOKEN_VERSION {
            return Err(invalid());
        }
        if envelope.fp != expected_fingerprint {
            return Err(Error::invalid_argument(
                "page token does not match this request's parent, filter, or page size",
            ));
        }
        Ok(Self {
            cursor: envelope.cursor,
            fingerprint: envelope.fp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp() -> String {
        fingerprint(Kind::Api, "projects/p/locations/global/apis/-", "", 10)
    }

    #[test]
    fn roundtrip() {
        let token = PageToken::new("projects/p/locations/global/apis/a".into(), fp());
        let decoded = PageToken::decode(&token.encode(), &fp()).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn foreign_tokens_are_rejected() {
        for garbled in ["this token is not valid", "", "AAAA", "!!!!"] {
            assert!(
                PageToken::decode(garbled, &fp()).is_err(),
                "{garbled:?} should be rejected"
            );
        }
    }

    #[test]
    fn fingerprint_mismatch_is_rejected() {
        let token = PageToken::new("cursor".into(), fp()).encode();
        let other = fingerprint(Kind::Api, "projects/p/locations/global/apis/-", "", 20);
        assert!(PageToken::decode(&token, &other).is_err());
    }

    #[test]
    fn fingerprint_varies_by_shape() {
        let base = fp();
        assert_ne!(
            base,
            fingerprint(Kind::Version, "projects/p/locations/global/apis/-", "", 10)
        );
        assert_ne!(
            base,
            fingerprint(
                Kind::Api,
                "projects/p/locations/global/apis/-",
                "description != ''",
                10
            )
        );
    }
}
