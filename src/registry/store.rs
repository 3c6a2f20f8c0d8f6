//! The registry store and its atomic operations

use crate::core::sync::handle_mutex_poison;
use crate::engine::InfoHash;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::types::{SeedCandidate, TorrentRecord};
use crate::scanner::Discovered;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

/// Mapping from content identity to its tracking record.
///
/// Every operation takes the single lock once for its whole
/// read-modify-write sequence, so a reader can never observe a partially
/// updated registry. Deletion happens only through the expiry operations;
/// re-discovery and reconciliation update fields in place.
pub struct Registry {
    records: Mutex<HashMap<InfoHash, TorrentRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, HashMap<InfoHash, TorrentRecord>>> {
        handle_mutex_poison(self.records.lock(), |message| RegistryError::Poisoned {
            message,
        })
    }

    /// Insert a fresh record for every descriptor whose identity is not yet
    /// tracked. Existing records are left entirely untouched, so repeated
    /// discovery never resets `last_seen` or the flags. Returns the number
    /// of newly inserted records.
    pub fn merge_discovered(
        &self,
        discovered: &[Discovered],
        now: SystemTime,
    ) -> RegistryResult<usize> {
        let mut records = self.lock()?;
        let mut inserted = 0;
        for item in discovered {
            records
                .entry(item.descriptor.info_hash)
                .or_insert_with(|| {
                    inserted += 1;
                    TorrentRecord::discovered(item.filename.clone(), now)
                });
        }
        Ok(inserted)
    }

    /// Align every record's `registered` flag with the authority's expected
    /// filename set; confirmed records also get `last_seen` refreshed.
    /// Unwanted records are unmarked, never removed.
    ///
    /// Returns the anomalies: expected names matched by no record, for the
    /// caller to report.
    pub fn reconcile_authority(
        &self,
        expected: &HashSet<String>,
        now: SystemTime,
    ) -> RegistryResult<Vec<String>> {
        let mut records = self.lock()?;
        let mut matched: HashSet<&str> = HashSet::new();
        for record in records.values_mut() {
            if expected.contains(&record.filename) {
                record.registered = true;
                record.last_seen = now;
            } else {
                record.registered = false;
            }
        }
        for record in records.values() {
            if record.registered {
                matched.insert(record.filename.as_str());
            }
        }

        let mut anomalies: Vec<String> = expected
            .iter()
            .filter(|name| !matched.contains(name.as_str()))
            .cloned()
            .collect();
        anomalies.sort();
        Ok(anomalies)
    }

    /// The exact work set for a seeding pass: registered but not yet handed
    /// to the engine.
    pub fn seed_candidates(&self) -> RegistryResult<Vec<SeedCandidate>> {
        let records = self.lock()?;
        let mut candidates: Vec<SeedCandidate> = records
            .iter()
            .filter(|(_, record)| record.registered && !record.seeding)
            .map(|(info_hash, record)| SeedCandidate {
                info_hash: *info_hash,
                filename: record.filename.clone(),
            })
            .collect();
        candidates.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(candidates)
    }

    /// Mark a submission as handed to the engine. Idempotent; unknown
    /// identities are ignored.
    pub fn mark_seeding(&self, info_hash: &InfoHash) -> RegistryResult<()> {
        let mut records = self.lock()?;
        if let Some(record) = records.get_mut(info_hash) {
            record.seeding = true;
        }
        Ok(())
    }

    /// Records continuously unwanted for longer than the retention window
    pub fn expired_candidates(
        &self,
        now: SystemTime,
        window: Duration,
    ) -> RegistryResult<Vec<SeedCandidate>> {
        let records = self.lock()?;
        let mut expired: Vec<SeedCandidate> = records
            .iter()
            .filter(|(_, record)| Self::is_expired(record, now, window))
            .map(|(info_hash, record)| SeedCandidate {
                info_hash: *info_hash,
                filename: record.filename.clone(),
            })
            .collect();
        expired.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(expired)
    }

    /// Remove a record, re-checking expiry eligibility under the lock. The
    /// stop request to the engine happens between selection and removal,
    /// outside the lock, so the state may have moved on; a record that was
    /// re-registered in the meantime survives.
    pub fn remove_if_expired(
        &self,
        info_hash: &InfoHash,
        now: SystemTime,
        window: Duration,
    ) -> RegistryResult<bool> {
        let mut records = self.lock()?;
        let eligible = records
            .get(info_hash)
            .map(|record| Self::is_expired(record, now, window))
            .unwrap_or(false);
        if eligible {
            records.remove(info_hash);
        }
        Ok(eligible)
    }

    pub fn record(&self, info_hash: &InfoHash) -> RegistryResult<Option<TorrentRecord>> {
        Ok(self.lock()?.get(info_hash).cloned())
    }

    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Snapshot for debug dumps and tests
    pub fn snapshot(&self) -> RegistryResult<Vec<(InfoHash, TorrentRecord)>> {
        let records = self.lock()?;
        let mut entries: Vec<(InfoHash, TorrentRecord)> = records
            .iter()
            .map(|(info_hash, record)| (*info_hash, record.clone()))
            .collect();
        entries.sort_by(|a, b| a.1.filename.cmp(&b.1.filename));
        Ok(entries)
    }

    fn is_expired(record: &TorrentRecord, now: SystemTime, window: Duration) -> bool {
        if record.registered {
            return false;
        }
        now.duration_since(record.last_seen)
            .map(|age| age > window)
            .unwrap_or(false)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
