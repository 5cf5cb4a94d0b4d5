use std::path::Path;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::analysis::error::ConfigError;
use crate::cache::cache_manager::DEFAULT_TTL_HOURS;
use crate::spec::boundary::BoundaryPolicy;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-testgen",
    version,
    about = "Generate test cases and Playwright page objects from page markup"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: page-testgen.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Cache directory (overrides config)
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a saved page and emit test artifacts
    Analyze {
        /// HTML file to analyze
        #[arg(long)]
        input: String,

        /// URL the markup was fetched from
        #[arg(long)]
        url: String,

        /// Skip the result cache
        #[arg(long)]
        no_cache: bool,

        /// Output format: json, markdown, pom, spec, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Write every artifact into this directory instead of printing
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Manage the result cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Delete expired entries
    Purge,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-testgen.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub synthesis: BoundaryPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: String,

    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_hours: DEFAULT_TTL_HOURS,
            enabled: true,
        }
    }
}

// Serde default helpers
fn default_cache_dir() -> String { ".cache".to_string() }
fn default_ttl_hours() -> i64 { DEFAULT_TTL_HOURS }
fn default_true() -> bool { true }

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "page-testgen.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match try_load_config(Path::new(config_path)) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(error = %e, "using default config");
            AppConfig::default()
        }
    }
}

/// Load config from a YAML file, reporting why it could not be used.
pub fn try_load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
