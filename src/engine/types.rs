//! Data types crossing the engine boundary

use sha2::{Digest, Sha256};
use std::fmt;

/// Fixed-length digest uniquely identifying one distributable content item.
/// Used as the registry key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoHash([u8; 32]);

impl InfoHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Digest of arbitrary bytes; handy for deterministic test fixtures and
    /// engines that identify content by hashing its metadata block.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self)
    }
}

/// Peer identity handed to the engine at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityToken([u8; 20]);

impl IdentityToken {
    /// Derive a stable identity token from the configured agent name
    pub fn from_agent(agent_name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(agent_name.as_bytes());
        let digest = hasher.finalize();
        let mut token = [0u8; 20];
        token.copy_from_slice(&digest[..20]);
        Self(token)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

/// Parsed representation of one descriptor file: content identity, display
/// name, and the constituent files it describes. Produced by the engine's
/// parser; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    pub info_hash: InfoHash,
    pub name: String,
    pub files: Vec<String>,
}

/// Engine transfer options applied at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSettings {
    pub nat_traversal: bool,
    pub local_discovery: bool,
    pub port_mapping: bool,
}

/// Events drained from the engine's queue. Observational only: the registry
/// is updated optimistically at submission time, not from these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SeedStarted { info_hash: InfoHash, name: String },
    SeedStopped { info_hash: InfoHash },
}
