use std::path::PathBuf;

/// Failures that abort analysis of a single page.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Empty markup or an unusable source URL. Nothing was cached or computed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The markup could not be turned into a document at all.
    #[error("parsing failed: {0}")]
    Parsing(String),
}

/// Failures of the persisted cache.
///
/// Never fatal to analysis: a failed read is treated as a miss and a failed
/// write still returns the fresh result.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache entry {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failures loading a config file strictly.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
