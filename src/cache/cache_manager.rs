use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::analysis::error::CacheError;
use crate::analysis::result::AnalysisResult;
use crate::cache::clock::{Clock, SystemClock};

/// How long an entry stays valid unless configured otherwise.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// SHA-256 digest of source URL followed by markup, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One persisted entry: `<dir>/<key>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub payload: AnalysisResult,
}

// ============================================================================
// CacheManager
// ============================================================================

/// Content-addressed, time-expiring store of analysis results on disk.
///
/// Entries are written to a temporary file in the cache directory and renamed
/// into place, so a concurrent `lookup` sees either the previous entry or the
/// complete new one. Expired entries are removed lazily by `lookup` or in bulk
/// by `purge_expired`.
pub struct CacheManager {
    dir: PathBuf,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl CacheManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: TimeDelta::hours(DEFAULT_TTL_HOURS),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Digest over the URL bytes followed by the markup bytes.
    pub fn key(source_url: &str, markup: &str) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(source_url.as_bytes());
        hasher.update(markup.as_bytes());
        CacheKey(hex::encode(hasher.finalize()))
    }

    /// Return the stored result if present and not expired.
    ///
    /// An expired entry is deleted and reported as absent.
    pub fn lookup(&self, key: &CacheKey) -> Result<Option<AnalysisResult>, CacheError> {
        let path = self.entry_path(key);

        let Some(entry) = read_entry(&path)? else {
            return Ok(None);
        };

        if !self.is_fresh(entry.timestamp) {
            debug!(key = %key, "removing expired cache entry");
            remove_entry(&path)?;
            return Ok(None);
        }

        if entry.key != key.as_str() {
            warn!(key = %key, stored = %entry.key, "cache entry key mismatch; ignoring");
            return Ok(None);
        }

        Ok(Some(entry.payload))
    }

    /// Persist `result` under `key` with a fresh timestamp, replacing any
    /// previous entry.
    pub fn store(&self, key: &CacheKey, result: &AnalysisResult) -> Result<(), CacheError> {
        let entry = CacheEntry {
            key: key.to_string(),
            timestamp: self.clock.now(),
            payload: result.clone(),
        };
        let bytes = serde_json::to_vec(&entry).map_err(CacheError::Serialize)?;

        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.entry_path(key);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        tmp.write_all(&bytes).map_err(|source| CacheError::Io {
            path: tmp.path().to_path_buf(),
            source,
        })?;
        tmp.persist(&path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        Ok(())
    }

    /// Remove every expired entry. Returns how many were removed.
    ///
    /// Unreadable or corrupt files are logged and left in place.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut removed = 0;
        for dir_entry in entries {
            let dir_entry = dir_entry.map_err(|source| CacheError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match read_entry(&path) {
                Ok(Some(entry)) if !self.is_fresh(entry.timestamp) => {
                    remove_entry(&path)?;
                    removed += 1;
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable cache entry"),
            }
        }

        Ok(removed)
    }

    /// Fresh iff `0 <= now - timestamp < ttl`. A timestamp from the future
    /// counts as expired.
    fn is_fresh(&self, timestamp: DateTime<Utc>) -> bool {
        let age = self.clock.now() - timestamp;
        age >= TimeDelta::zero() && age < self.ttl
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| CacheError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Delete an entry; a concurrent lookup may have removed it already.
fn remove_entry(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
