//! Authority Error Types

#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// The lookup command could not be started at all
    #[error("Failed to run authority command '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The lookup command ran but reported failure. Phase-scoped: the
    /// current cycle skips authority reconciliation and tries again later.
    #[error("Authority command failed: {status}")]
    Unavailable { status: std::process::ExitStatus },

    #[error("Authority client internal error: {message}")]
    Internal { message: String },
}

/// Result type for authority operations
pub type AuthorityResult<T> = Result<T, AuthorityError>;
