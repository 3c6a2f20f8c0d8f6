//! In-memory engine used by the unit tests

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::traits::DistributionEngine;
use crate::engine::types::{
    ContentDescriptor, EngineEvent, IdentityToken, InfoHash, TransferSettings,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scriptable `DistributionEngine` that serves canned descriptors, records
/// every submission, and replays queued events.
#[derive(Default)]
pub struct MockEngine {
    descriptors: Mutex<HashMap<String, ContentDescriptor>>,
    parse_failures: Mutex<HashSet<String>>,
    submit_failures: Mutex<HashSet<InfoHash>>,
    stop_failures: Mutex<HashSet<InfoHash>>,
    refuse_listen: AtomicBool,
    parse_delay: Mutex<Option<Duration>>,
    submitted: Mutex<Vec<ContentDescriptor>>,
    stopped: Mutex<Vec<InfoHash>>,
    events: Mutex<VecDeque<EngineEvent>>,
    identity: Mutex<Option<IdentityToken>>,
    settings: Mutex<Option<TransferSettings>>,
    listening: AtomicBool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a descriptor whose identity is the digest of its name
    pub fn descriptor(name: &str) -> ContentDescriptor {
        ContentDescriptor {
            info_hash: InfoHash::digest(name.as_bytes()),
            name: name.to_string(),
            files: vec![format!("{}.img", name)],
        }
    }

    /// Serve `descriptor` for any path whose file name matches `file_name`
    pub fn register_descriptor(&self, file_name: &str, descriptor: ContentDescriptor) {
        self.descriptors
            .lock()
            .unwrap()
            .insert(file_name.to_string(), descriptor);
    }

    pub fn fail_parse(&self, file_name: &str) {
        self.parse_failures
            .lock()
            .unwrap()
            .insert(file_name.to_string());
    }

    pub fn clear_parse_failure(&self, file_name: &str) {
        self.parse_failures.lock().unwrap().remove(file_name);
    }

    pub fn fail_submission(&self, info_hash: InfoHash) {
        self.submit_failures.lock().unwrap().insert(info_hash);
    }

    pub fn fail_stop(&self, info_hash: InfoHash) {
        self.stop_failures.lock().unwrap().insert(info_hash);
    }

    pub fn clear_stop_failure(&self, info_hash: InfoHash) {
        self.stop_failures.lock().unwrap().remove(&info_hash);
    }

    pub fn refuse_listen(&self) {
        self.refuse_listen.store(true, Ordering::SeqCst);
    }

    /// Delay every parse; used to hold a cycle in flight
    pub fn set_parse_delay(&self, delay: Duration) {
        *self.parse_delay.lock().unwrap() = Some(delay);
    }

    pub fn push_event(&self, event: EngineEvent) {
        self.events.lock().unwrap().push_back(event);
    }

    pub fn submitted(&self) -> Vec<ContentDescriptor> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submission_count(&self, info_hash: InfoHash) -> usize {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.info_hash == info_hash)
            .count()
    }

    pub fn stopped(&self) -> Vec<InfoHash> {
        self.stopped.lock().unwrap().clone()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn identity(&self) -> Option<IdentityToken> {
        *self.identity.lock().unwrap()
    }

    pub fn settings(&self) -> Option<TransferSettings> {
        *self.settings.lock().unwrap()
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl DistributionEngine for MockEngine {
    async fn listen(
        &self,
        _port_range: RangeInclusive<u16>,
        bind_address: &str,
    ) -> EngineResult<()> {
        if self.refuse_listen.load(Ordering::SeqCst) {
            return Err(EngineError::Listen {
                address: bind_address.to_string(),
                message: "address in use".to_string(),
            });
        }
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn set_identity(&self, token: IdentityToken) {
        *self.identity.lock().unwrap() = Some(token);
    }

    async fn configure(&self, settings: &TransferSettings) -> EngineResult<()> {
        *self.settings.lock().unwrap() = Some(*settings);
        Ok(())
    }

    async fn parse_descriptor(&self, path: &Path) -> EngineResult<ContentDescriptor> {
        let delay = *self.parse_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let name = Self::file_name(path);
        if self.parse_failures.lock().unwrap().contains(&name) {
            return Err(EngineError::Parse {
                path: path.display().to_string(),
                message: "corrupt metadata".to_string(),
            });
        }
        self.descriptors
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .ok_or_else(|| EngineError::Parse {
                path: path.display().to_string(),
                message: "not a descriptor".to_string(),
            })
    }

    async fn submit_seed(&self, descriptor: ContentDescriptor) -> EngineResult<()> {
        if self
            .submit_failures
            .lock()
            .unwrap()
            .contains(&descriptor.info_hash)
        {
            return Err(EngineError::Submission {
                message: format!("rejected {}", descriptor.info_hash),
            });
        }
        self.submitted.lock().unwrap().push(descriptor);
        Ok(())
    }

    async fn submit_stop(&self, info_hash: InfoHash) -> EngineResult<()> {
        if self.stop_failures.lock().unwrap().contains(&info_hash) {
            return Err(EngineError::Submission {
                message: format!("stop rejected for {}", info_hash),
            });
        }
        self.stopped.lock().unwrap().push(info_hash);
        Ok(())
    }

    async fn poll_events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}
