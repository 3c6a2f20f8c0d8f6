//! Engine Error Types

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to open listen socket on {address}: {message}")]
    Listen { address: String, message: String },

    #[error("Failed to parse descriptor '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Seed submission rejected: {message}")]
    Submission { message: String },
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
