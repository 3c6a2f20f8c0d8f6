//! Seed submission driving

use crate::engine::{DistributionEngine, EngineEvent};
use crate::registry::{Registry, RegistryResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Drives engine submissions for newly eligible content and drains the
/// engine's event queue.
pub struct SeedingCoordinator {
    engine: Arc<dyn DistributionEngine>,
    registry: Arc<Registry>,
    watch_dir: PathBuf,
}

impl SeedingCoordinator {
    pub fn new(
        engine: Arc<dyn DistributionEngine>,
        registry: Arc<Registry>,
        watch_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            registry,
            watch_dir,
        }
    }

    /// Submit every current seed candidate to the engine.
    ///
    /// Each candidate's descriptor is re-parsed fresh from disk; the copy
    /// from the discovery phase may be a cycle old. A record is marked as
    /// seeding immediately after submission, before the engine confirms;
    /// otherwise a slow engine would make the next cycle submit the same
    /// content again. Parse and submission failures are item-scoped: skip
    /// now, retry automatically next cycle since nothing gets marked.
    ///
    /// Returns the number of submissions handed to the engine.
    pub async fn submit_pending(&self) -> RegistryResult<usize> {
        let candidates = self.registry.seed_candidates()?;
        let mut submitted = 0;

        for candidate in candidates {
            let path = self.watch_dir.join(&candidate.filename);
            let descriptor = match self.engine.parse_descriptor(&path).await {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    log::warn!(
                        "Error reading descriptor file '{}': {}",
                        path.display(),
                        e
                    );
                    continue;
                }
            };

            if let Err(e) = self.engine.submit_seed(descriptor).await {
                log::warn!("Seed submission for '{}' failed: {}", candidate.filename, e);
                continue;
            }

            log::info!("'{}' handed to the engine for seeding", candidate.filename);
            self.registry.mark_seeding(&candidate.info_hash)?;
            submitted += 1;
        }

        Ok(submitted)
    }

    /// Drain and log engine events. Observational only: the registry was
    /// already updated optimistically at submission time.
    pub async fn drain_events(&self) {
        for event in self.engine.poll_events().await {
            match event {
                EngineEvent::SeedStarted { name, info_hash } => {
                    log::info!("'{}' ({}) started seeding", name, info_hash);
                }
                EngineEvent::SeedStopped { info_hash } => {
                    log::warn!("Engine reports seed stopped for {}", info_hash);
                }
            }
        }
    }
}
