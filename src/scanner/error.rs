//! Scanner Error Types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Not a descriptor file at all: name shorter than the suffix or not
    /// ending with it. Item-scoped, skipped silently beyond a debug line.
    #[error("Not a descriptor file: '{0}'")]
    ForeignFile(PathBuf),

    /// The engine's parser rejected the file content. Item-scoped.
    #[error("Invalid descriptor '{path}': {message}")]
    InvalidDescriptor { path: PathBuf, message: String },

    /// The directory listing itself failed
    #[error("Failed to list '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;
