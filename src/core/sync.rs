//! Synchronization utilities for robust mutex handling
//!
//! Converts mutex poisoning into application-specific errors so a panic in
//! one task never leaves callers unwinding on a bare `PoisonError`.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts a poison error from a lock operation into an application error
/// built by the provided constructor. Used wherever a shared map is guarded
/// by a `Mutex`, so every lock site reports poisoning the same way.
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
