/// Longest filename accepted for uploads, in bytes.
///
/// Keeps `{uuid}-{filename}` well inside the 1024-byte S3 key limit.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Why an upload filename was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename exceeds [`MAX_FILENAME_BYTES`].
    TooLong,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `..`.
    PathTraversal,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters, including NUL, CR and LF.
    ControlCharacter,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::TooLong => "Filename must be at most 255 bytes",
            Self::ContainsPathSeparator => "Filename must not contain path separators",
            Self::PathTraversal => "Filename must not be '..'",
            Self::Hidden => "Filename must not start with '.'",
            Self::ControlCharacter => "Filename must not contain control characters",
        }
    }
}

/// Validate the name of an uploaded file and return it trimmed.
///
/// The result becomes the suffix of the object key, so it must be a single
/// flat path segment.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }
    if trimmed.len() > MAX_FILENAME_BYTES {
        return Err(FilenameError::TooLong);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(FilenameError::ControlCharacter);
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }
    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }
    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}
