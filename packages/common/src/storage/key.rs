use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

/// S3 caps object keys at 1024 bytes.
const MAX_KEY_LEN: usize = 1024;

/// Length of a hyphenated UUID string.
const UUID_LEN: usize = 36;

/// A validated object key.
///
/// Generated keys have the form `{uuid-v4}-{filename}`: the random prefix
/// makes them globally unique while the suffix keeps the original filename
/// recognisable in the bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Generate a fresh, collision-resistant key for an uploaded file.
    pub fn generate(filename: &str) -> Result<Self, StorageError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(StorageError::InvalidKey("filename must not be empty".into()));
        }
        if filename.contains('/') || filename.contains('\\') {
            return Err(StorageError::InvalidKey(
                "filename must not contain path separators".into(),
            ));
        }
        Self::parse(&format!("{}-{}", Uuid::new_v4(), filename))
    }

    /// Validate an existing key string.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".into()));
        }
        if s.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey(format!(
                "key exceeds {MAX_KEY_LEN} bytes"
            )));
        }
        if s.chars().any(|c| c.is_control()) {
            return Err(StorageError::InvalidKey(
                "key must not contain control characters".into(),
            ));
        }
        if s.starts_with('/') || s.split('/').any(|seg| seg == "..") {
            return Err(StorageError::InvalidKey(
                "key must be relative and free of '..' segments".into(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The original filename portion of a generated key, or the whole key
    /// when it carries no UUID prefix.
    pub fn filename(&self) -> &str {
        let prefixed = self
            .0
            .get(..UUID_LEN)
            .is_some_and(|prefix| Uuid::parse_str(prefix).is_ok())
            && self.0.as_bytes().get(UUID_LEN) == Some(&b'-');

        match self.0.get(UUID_LEN + 1..) {
            Some(rest) if prefixed && !rest.is_empty() => rest,
            _ => &self.0,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = StorageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}
