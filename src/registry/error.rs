//! Registry Error Types

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry lock poisoned: {message}")]
    Poisoned { message: String },
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
