//! Resource models for the five registry kinds.
//!
//! Each model is a plain serde struct plus a [`crate::resource::Resource`]
//! impl wiring it into the engine: name grammar hooks, the filter field
//! table, and the field-mask update behaviors.

mod api;
mod artifact;
mod project;
mod spec;
mod version;

pub use api::Api;
pub use artifact::Artifact;
pub use project::Project;
pub use spec::ApiSpec;
pub use version::ApiVersion;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `bytes`, used for content digests.
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Serializes opaque byte contents as base64 strings in JSON.
pub(crate) mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_is_lowercase() {
        let digest = sha256_hex(b"hello");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, digest.to_lowercase());
    }
}
