//! Registry record types

use crate::engine::InfoHash;
use chrono::{DateTime, Local};
use std::fmt;
use std::time::SystemTime;

/// Tracking state for one content identity.
///
/// Created once on first local discovery and then mutated in place: the
/// identity is never re-inserted, only its flags and `last_seen` move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentRecord {
    /// Name of the descriptor file this record was discovered from
    pub filename: String,
    /// Discovery time, refreshed whenever the authority confirms the record
    pub last_seen: SystemTime,
    /// Whether the authority currently wants this content
    pub registered: bool,
    /// Whether a seed submission has been handed to the engine
    pub seeding: bool,
}

impl TorrentRecord {
    pub fn discovered(filename: String, now: SystemTime) -> Self {
        Self {
            filename,
            last_seen: now,
            registered: false,
            seeding: false,
        }
    }
}

impl fmt::Display for TorrentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_seen: DateTime<Local> = self.last_seen.into();
        write!(
            f,
            "(file: '{}', last seen: '{}', registered: {}, seeding: {})",
            self.filename,
            last_seen.format("%Y-%m-%d %H:%M:%S"),
            self.registered,
            self.seeding
        )
    }
}

/// A record selected for engine work, cloned out of the registry so the
/// caller holds no lock while it performs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCandidate {
    pub info_hash: InfoHash,
    pub filename: String,
}
