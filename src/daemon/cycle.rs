//! The reconciliation cycle
//!
//! One cycle runs four phases in fixed order: discover local descriptors,
//! refresh against the authority, drive seeding, collect garbage. Each
//! registry operation is atomic on its own but the sequence is not, so an
//! explicit in-flight guard keeps cycles from ever interleaving.

use crate::authority::AuthorityClient;
use crate::core::config::SeederConfig;
use crate::daemon::error::CycleResult;
use crate::engine::DistributionEngine;
use crate::registry::Registry;
use crate::scanner::DescriptorScanner;
use crate::seeding::{GarbageCollector, SeedingCoordinator};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

/// Counts reported by a completed cycle, for the end-of-cycle summary line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Descriptors parsed during discovery
    pub discovered: usize,
    /// Records newly inserted into the registry
    pub merged: usize,
    /// Whether the authority answered this cycle
    pub authority_reachable: bool,
    /// Expected names the authority reported
    pub expected: usize,
    /// Expected names with no descriptor on disk
    pub anomalies: usize,
    /// Seed submissions handed to the engine
    pub submitted: usize,
    /// Records retired by the collector
    pub collected: usize,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "discovered {} (new {}), authority {} ({} expected, {} missing), submitted {}, retired {}",
            self.discovered,
            self.merged,
            if self.authority_reachable { "ok" } else { "unavailable" },
            self.expected,
            self.anomalies,
            self.submitted,
            self.collected
        )
    }
}

/// Outcome of a cycle trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleStats),
    /// Another cycle was in flight; this trigger was dropped
    Busy,
}

/// Scope-bound in-flight flag. Releases on every exit path, early returns
/// and propagated errors included.
struct CycleGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CycleGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Composes the scanner, authority client, coordinator, and collector into
/// the sequential four-phase cycle.
pub struct Reconciler {
    registry: Arc<Registry>,
    scanner: DescriptorScanner,
    authority: AuthorityClient,
    coordinator: SeedingCoordinator,
    collector: GarbageCollector,
    watch_dir: PathBuf,
    in_flight: AtomicBool,
}

impl Reconciler {
    pub fn new(
        engine: Arc<dyn DistributionEngine>,
        registry: Arc<Registry>,
        config: &SeederConfig,
    ) -> Self {
        let scanner =
            DescriptorScanner::new(engine.clone(), config.descriptor_suffix.clone());
        let authority = AuthorityClient::new(
            config.authority_command.clone(),
            config.descriptor_suffix.clone(),
        );
        let coordinator = SeedingCoordinator::new(
            engine.clone(),
            registry.clone(),
            config.watch_dir.clone(),
        );
        let collector = GarbageCollector::new(
            engine,
            registry.clone(),
            config.retention_window(),
            config.stop_ack_required,
        );

        Self {
            registry,
            scanner,
            authority,
            coordinator,
            collector,
            watch_dir: config.watch_dir.clone(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn authority(&self) -> &AuthorityClient {
        &self.authority
    }

    /// Run one full cycle, phases strictly in order, no phase starting
    /// before the previous completes. A trigger landing while a cycle is in
    /// flight gets `Busy` back and performs no work at all.
    pub async fn run_cycle(&self) -> CycleResult<CycleOutcome> {
        let _guard = match CycleGuard::try_acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                log::warn!("Reconciliation cycle already in flight; trigger dropped");
                return Ok(CycleOutcome::Busy);
            }
        };

        let mut stats = CycleStats::default();

        // Phase (a): discover local descriptors. A failed listing only
        // skips discovery for this cycle.
        match self.scanner.scan(&self.watch_dir).await {
            Ok(discovered) => {
                stats.discovered = discovered.len();
                stats.merged = self
                    .registry
                    .merge_discovered(&discovered, SystemTime::now())?;
            }
            Err(e) => log::error!("Discovery scan failed: {}", e),
        }

        // Phase (b): authority refresh. An unreachable authority skips the
        // phase and leaves every record exactly as it was; an empty answer
        // is a valid inventory and reconciles normally.
        match self.authority.fetch_expected_names().await {
            Ok(expected) => {
                stats.authority_reachable = true;
                stats.expected = expected.len();
                let anomalies = self
                    .registry
                    .reconcile_authority(&expected, SystemTime::now())?;
                stats.anomalies = anomalies.len();
                for name in &anomalies {
                    log::error!(
                        "'{}' present in the authority inventory but does not exist on disk",
                        name
                    );
                }
            }
            Err(e) => {
                log::error!("Skipping authority refresh: {}", e);
            }
        }

        // Phase (c): seeding
        stats.submitted = self.coordinator.submit_pending().await?;
        self.coordinator.drain_events().await;

        // Phase (d): collection
        stats.collected = self.collector.collect(SystemTime::now()).await?;

        Ok(CycleOutcome::Completed(stats))
    }
}
