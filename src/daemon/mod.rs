//! Daemon lifecycle and scheduling
//!
//! Brings the engine up, then runs reconciliation cycles sequentially off a
//! periodic timer and out-of-band refresh triggers. The embedding process
//! owns signals, daemonization, and CLI; it drives this through
//! [`ControlHandle`].

pub mod control;
pub mod cycle;
pub mod error;

pub use control::ControlHandle;
pub use cycle::{CycleOutcome, CycleStats, Reconciler};
pub use error::{CycleError, CycleResult, StartupError};

use crate::core::config::SeederConfig;
use crate::engine::{DistributionEngine, IdentityToken, TransferSettings};
use crate::registry::Registry;
use std::sync::Arc;
use std::time::Duration;

/// The assembled seeding daemon.
///
/// `init` performs the engine bring-up; any failure there is terminal and
/// the caller must not proceed to `run`. `run` loops one cycle at a time
/// until a stop is requested, waiting out the poll interval in between
/// unless a refresh trigger cuts the wait short.
pub struct Daemon {
    reconciler: Arc<Reconciler>,
    control: ControlHandle,
    poll_interval: Duration,
}

impl Daemon {
    /// Validate configuration and bring the engine up: bind the listening
    /// socket, set the peer identity, apply transfer options.
    pub async fn init(
        engine: Arc<dyn DistributionEngine>,
        config: SeederConfig,
    ) -> Result<Self, StartupError> {
        config.validate()?;

        engine
            .listen(
                config.listen_port_min..=config.listen_port_max,
                &config.listen_address,
            )
            .await?;
        engine
            .set_identity(IdentityToken::from_agent(&config.agent_name))
            .await;
        engine
            .configure(&TransferSettings {
                nat_traversal: config.nat_traversal,
                local_discovery: config.local_discovery,
                port_mapping: config.port_mapping,
            })
            .await?;

        log::info!(
            "Engine listening on {} ports {}-{}",
            config.listen_address,
            config.listen_port_min,
            config.listen_port_max
        );

        let registry = Arc::new(Registry::new());
        let reconciler = Arc::new(Reconciler::new(engine, registry, &config));

        Ok(Self {
            reconciler,
            control: ControlHandle::new(),
            poll_interval: config.poll_interval(),
        })
    }

    /// Handle for raising stop and refresh triggers from outside
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.reconciler.registry()
    }

    pub fn reconciler(&self) -> Arc<Reconciler> {
        self.reconciler.clone()
    }

    /// Run cycles until stop is requested.
    ///
    /// Strictly sequential: each cycle's mutations are fully committed
    /// before the next begins, and a stop takes effect after the running
    /// cycle completes rather than aborting it. Only registry lock
    /// poisoning ends the loop with an error.
    pub async fn run(&self) -> CycleResult<()> {
        log::info!(
            "Reconciliation scheduler started, interval {}s",
            self.poll_interval.as_secs()
        );

        loop {
            if self.control.stop_requested() {
                break;
            }

            // A refresh queued during the wait (or the previous cycle) is
            // served by the cycle we are about to run.
            self.control.take_refresh();

            match self.reconciler.run_cycle().await? {
                CycleOutcome::Completed(stats) => log::info!("Cycle complete: {}", stats),
                CycleOutcome::Busy => {
                    // Cannot happen from this loop; logged by the cycle
                }
            }

            if self.control.stop_requested() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = self.control.wait_for_wake() => {}
            }
        }

        log::info!("Reconciliation scheduler stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::engine::EngineError;
    use std::time::Duration;
    use tokio::time::timeout;

    fn config(watch_dir: std::path::PathBuf, inventory: &std::path::Path) -> SeederConfig {
        SeederConfig {
            watch_dir,
            authority_command: vec![
                "sh".to_string(),
                "-c".to_string(),
                format!("cat '{}' 2>/dev/null || exit 7", inventory.display()),
            ],
            poll_interval: 3600,
            agent_name: "seedkeeper-test".to_string(),
            ..SeederConfig::default()
        }
    }

    #[tokio::test]
    async fn test_init_brings_the_engine_up() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new());
        let config = config(dir.path().to_path_buf(), &dir.path().join("inventory"));

        let _daemon = Daemon::init(engine.clone(), config).await.unwrap();

        assert!(engine.is_listening());
        assert_eq!(
            engine.identity(),
            Some(IdentityToken::from_agent("seedkeeper-test"))
        );
        let settings = engine.settings().unwrap();
        assert!(settings.nat_traversal && settings.local_discovery && settings.port_mapping);
    }

    #[tokio::test]
    async fn test_init_fails_when_engine_cannot_listen() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new());
        engine.refuse_listen();
        let config = config(dir.path().to_path_buf(), &dir.path().join("inventory"));

        let result = Daemon::init(engine, config).await;
        assert!(matches!(
            result,
            Err(StartupError::Engine(EngineError::Listen { .. }))
        ));
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_config() {
        let engine = Arc::new(MockEngine::new());
        let result = Daemon::init(engine, SeederConfig::default()).await;
        assert!(matches!(result, Err(StartupError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_serves_refresh_and_stop_triggers() {
        let dir = tempfile::tempdir().unwrap();
        let watch_dir = dir.path().join("watch");
        std::fs::create_dir(&watch_dir).unwrap();
        let inventory = dir.path().join("inventory");
        std::fs::write(&inventory, "a\n").unwrap();

        let engine = Arc::new(MockEngine::new());
        std::fs::write(watch_dir.join("a.torrent"), b"meta").unwrap();
        engine.register_descriptor("a.torrent", MockEngine::descriptor("a"));

        let daemon = Arc::new(
            Daemon::init(engine.clone(), config(watch_dir, &inventory))
                .await
                .unwrap(),
        );
        let control = daemon.control();
        let registry = daemon.registry();

        let runner = {
            let daemon = daemon.clone();
            tokio::spawn(async move { daemon.run().await })
        };

        // The startup cycle seeds the registered content; the interval is
        // an hour, so any progress after that comes from triggers.
        let a = MockEngine::descriptor("a").info_hash;
        wait_until(|| registry.record(&a).unwrap().map(|r| r.seeding) == Some(true)).await;
        assert_eq!(engine.submission_count(a), 1);

        // A refresh trigger runs another cycle well before the timer
        std::fs::write(&inventory, "").unwrap();
        control.request_refresh();
        wait_until(|| registry.record(&a).unwrap().map(|r| !r.registered) == Some(true)).await;

        control.request_stop();
        let result = timeout(Duration::from_secs(5), runner).await;
        assert!(result.is_ok(), "run loop should exit promptly on stop");
        result.unwrap().unwrap().unwrap();
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("condition not reached in time");
    }

}
