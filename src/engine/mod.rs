//! Distribution engine boundary
//!
//! The peer-to-peer transfer machinery is an external collaborator; this
//! module defines the seam the reconciliation core drives it through (an
//! asynchronous submit interface plus a pollable event queue) together with
//! the data types that cross it.

pub mod error;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use error::{EngineError, EngineResult};
pub use traits::DistributionEngine;
pub use types::{ContentDescriptor, EngineEvent, IdentityToken, InfoHash, TransferSettings};
