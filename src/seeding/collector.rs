//! Retirement of content the authority no longer wants

use crate::engine::DistributionEngine;
use crate::registry::{Registry, RegistryResult};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Removes records that have been continuously unregistered for longer than
/// the retention window, stopping the live seed first.
///
/// Disabled unless a retention window is configured: without one the
/// registry grows without bound and decommissioned content is seeded
/// forever, so deployments are expected to set it.
pub struct GarbageCollector {
    engine: Arc<dyn DistributionEngine>,
    registry: Arc<Registry>,
    retention_window: Option<Duration>,
    stop_ack_required: bool,
}

impl GarbageCollector {
    pub fn new(
        engine: Arc<dyn DistributionEngine>,
        registry: Arc<Registry>,
        retention_window: Option<Duration>,
        stop_ack_required: bool,
    ) -> Self {
        Self {
            engine,
            registry,
            retention_window,
            stop_ack_required,
        }
    }

    /// Retire every expired record. Returns the number removed.
    ///
    /// For each expired record a stop request goes to the engine before
    /// removal. When `stop_ack_required` is set, a failed stop keeps the
    /// record so the whole retirement is retried next cycle; otherwise
    /// removal is best-effort. Removal re-checks eligibility under the
    /// registry lock, so a record the authority reclaimed in the meantime
    /// survives.
    pub async fn collect(&self, now: SystemTime) -> RegistryResult<usize> {
        let window = match self.retention_window {
            Some(window) => window,
            None => return Ok(0),
        };

        let expired = self.registry.expired_candidates(now, window)?;
        let mut removed = 0;

        for candidate in expired {
            if let Err(e) = self.engine.submit_stop(candidate.info_hash).await {
                log::warn!(
                    "Stop request for '{}' failed: {}",
                    candidate.filename,
                    e
                );
                if self.stop_ack_required {
                    continue;
                }
            }

            if self
                .registry
                .remove_if_expired(&candidate.info_hash, now, window)?
            {
                log::info!(
                    "'{}' retired after {}s out of the inventory",
                    candidate.filename,
                    window.as_secs()
                );
                removed += 1;
            }
        }

        Ok(removed)
    }
}
