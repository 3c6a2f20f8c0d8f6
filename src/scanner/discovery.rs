//! Directory scanning and descriptor parsing

use crate::engine::{ContentDescriptor, DistributionEngine};
use crate::scanner::error::{ScanError, ScanResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A successfully parsed descriptor together with the file name it came
/// from. The file name is what the registry records and what authority
/// reconciliation matches against.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub filename: String,
    pub descriptor: ContentDescriptor,
}

/// Scans a directory for descriptor files and parses them through the
/// engine. One bad file never aborts a scan.
pub struct DescriptorScanner {
    engine: Arc<dyn DistributionEngine>,
    suffix: String,
}

impl DescriptorScanner {
    pub fn new(engine: Arc<dyn DistributionEngine>, suffix: String) -> Self {
        Self { engine, suffix }
    }

    /// List directory entries without any filtering
    pub async fn list_candidates(&self, dir: &Path) -> ScanResult<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| ScanError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut candidates = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => candidates.push(entry.path()),
                Ok(None) => break,
                Err(e) => {
                    return Err(ScanError::Io {
                        path: dir.to_path_buf(),
                        source: e,
                    })
                }
            }
        }
        Ok(candidates)
    }

    /// Parse one candidate file into a descriptor
    ///
    /// Rejects names that cannot carry the configured suffix before handing
    /// the file to the engine's parser.
    pub async fn parse_descriptor(&self, path: &Path) -> ScanResult<Discovered> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if filename.len() < self.suffix.len() || !filename.ends_with(&self.suffix) {
            return Err(ScanError::ForeignFile(path.to_path_buf()));
        }

        log::info!("Descriptor file found: '{}'", filename);

        let descriptor =
            self.engine
                .parse_descriptor(path)
                .await
                .map_err(|e| ScanError::InvalidDescriptor {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;

        log::trace!(
            "'{}': info hash {}, name '{}', {} file(s)",
            filename,
            descriptor.info_hash,
            descriptor.name,
            descriptor.files.len()
        );

        Ok(Discovered {
            filename,
            descriptor,
        })
    }

    /// Scan a directory, returning every successfully parsed descriptor.
    /// Item failures are logged and skipped; only the listing itself failing
    /// is an error.
    pub async fn scan(&self, dir: &Path) -> ScanResult<Vec<Discovered>> {
        let candidates = self.list_candidates(dir).await?;
        log::debug!("{} entries in '{}'", candidates.len(), dir.display());

        let mut discovered = Vec::new();
        for path in candidates {
            match self.parse_descriptor(&path).await {
                Ok(item) => discovered.push(item),
                Err(ScanError::ForeignFile(path)) => {
                    log::debug!("Skipping '{}'", path.display());
                }
                Err(e) => {
                    log::warn!("{}", e);
                }
            }
        }
        Ok(discovered)
    }
}
