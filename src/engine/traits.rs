//! The interface the reconciliation core consumes from the engine

use crate::engine::error::EngineResult;
use crate::engine::types::{
    ContentDescriptor, EngineEvent, IdentityToken, InfoHash, TransferSettings,
};
use std::ops::RangeInclusive;
use std::path::Path;

/// Opaque collaborator performing the actual seeding and piece transfer.
///
/// The core never looks past this seam: submissions are fire-and-forget and
/// confirmations arrive later through `poll_events`. Implementations run
/// their own internal concurrency.
#[async_trait::async_trait]
pub trait DistributionEngine: Send + Sync {
    /// Bind the listening socket. Failure here is terminal for the daemon.
    async fn listen(&self, port_range: RangeInclusive<u16>, bind_address: &str)
        -> EngineResult<()>;

    /// Set the peer identity used on the wire
    async fn set_identity(&self, token: IdentityToken);

    /// Apply transfer options
    async fn configure(&self, settings: &TransferSettings) -> EngineResult<()>;

    /// Parse a descriptor file. The file format is opaque to the core beyond
    /// what this parser accepts.
    async fn parse_descriptor(&self, path: &Path) -> EngineResult<ContentDescriptor>;

    /// Submit content for seeding. Asynchronous from the core's perspective:
    /// acceptance here does not mean seeding has started.
    async fn submit_seed(&self, descriptor: ContentDescriptor) -> EngineResult<()>;

    /// Ask the engine to stop seeding the given content
    async fn submit_stop(&self, info_hash: InfoHash) -> EngineResult<()>;

    /// Drain pending engine events
    async fn poll_events(&self) -> Vec<EngineEvent>;
}
