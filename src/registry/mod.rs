//! Concurrent tracking registry
//!
//! One record per known content identity, guarded by a single lock. Merge,
//! reconcile, select, and mark operations are each atomic with respect to
//! one another; none performs I/O while holding the lock.

pub mod error;
pub mod store;
pub mod types;

pub use error::{RegistryError, RegistryResult};
pub use store::Registry;
pub use types::{SeedCandidate, TorrentRecord};
