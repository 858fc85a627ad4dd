use std::fmt;

/// Errors that can occur during object storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The requested object was not found.
    NotFound(String),
    /// The object key is malformed.
    InvalidKey(String),
    /// The backing store rejected or failed the request.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "object not found: {key}"),
            Self::InvalidKey(msg) => write!(f, "invalid object key: {msg}"),
            Self::Backend(msg) => write!(f, "object store error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(feature = "object-storage")]
impl From<::s3::error::S3Error> for StorageError {
    fn from(err: ::s3::error::S3Error) -> Self {
        Self::Backend(err.to_string())
    }
}
