//! Daemon Error Types

use crate::core::config::ConfigError;
use crate::engine::EngineError;
use crate::registry::RegistryError;

/// Failures during daemon initialisation. All of these are terminal: the
/// process must not proceed to scheduling.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Failures escaping a reconciliation cycle. Item- and phase-scoped errors
/// are absorbed inside the cycle; only registry lock poisoning gets out.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type CycleResult<T> = Result<T, CycleError>;
