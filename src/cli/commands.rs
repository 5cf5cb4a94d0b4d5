use std::path::Path;

use chrono::TimeDelta;
use tracing::warn;

use crate::analysis::analyzer::PageAnalyzer;
use crate::analysis::result::{AnalysisResult, CacheStatus};
use crate::cache::cache_manager::{CacheManager, DEFAULT_TTL_HOURS};
use crate::cli::config::AppConfig;
use crate::report::json::render_json;
use crate::report::markdown::render_markdown;
use crate::report::outputs::write_outputs;
use crate::report::playwright::render_spec_file;

// ============================================================================
// analyze subcommand
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_analyze(
    config: &AppConfig,
    cache_dir: Option<&str>,
    input: &str,
    url: &str,
    no_cache: bool,
    format: &str,
    output_dir: Option<&str>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = std::fs::read_to_string(input)
        .map_err(|e| format!("failed to read {}: {}", input, e))?;

    let analyzer = build_analyzer(config, cache_dir);
    let analysis = analyzer.analyze_detailed(&markup, url, !no_cache)?;

    if verbose > 0 {
        let counts = &analysis.result.metadata.element_counts;
        eprintln!(
            "{} test cases ({} forms, {} links, {} images) [cache: {}]",
            analysis.result.test_cases.len(),
            counts.forms,
            counts.links,
            counts.images,
            describe_cache(&analysis.cache)
        );
    }

    match output_dir {
        Some(dir) => {
            let written = write_outputs(&analysis.result, url, Path::new(dir))?;
            println!("Wrote {}", written.json.display());
            println!("Wrote {}", written.markdown.display());
            println!("Wrote {}", written.page_object.display());
            println!("Wrote {}", written.spec.display());
        }
        None => println!("{}", render_artifact(&analysis.result, url, format)?),
    }

    Ok(())
}

/// Render one artifact of a result for printing.
pub fn render_artifact(
    result: &AnalysisResult,
    url: &str,
    format: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        "json" => Ok(render_json(&result.test_cases)?),
        "markdown" | "md" => Ok(render_markdown(&result.test_cases)),
        "pom" => Ok(result.pom_code.clone()),
        "spec" => Ok(render_spec_file(result, url)),
        "all" => Ok(serde_json::to_string_pretty(result)?),
        other => Err(format!(
            "unknown format '{}' (expected json, markdown, pom, spec, all)",
            other
        )
        .into()),
    }
}

fn describe_cache(status: &CacheStatus) -> String {
    match status {
        CacheStatus::Hit => "hit".into(),
        CacheStatus::Miss => "miss".into(),
        CacheStatus::Bypassed => "bypassed".into(),
        CacheStatus::ReadFailed(e) => format!("read failed: {}", e),
        CacheStatus::WriteFailed(e) => format!("write failed: {}", e),
    }
}

// ============================================================================
// cache purge subcommand
// ============================================================================

pub fn cmd_cache_purge(
    config: &AppConfig,
    cache_dir: Option<&str>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let cache = build_cache(config, cache_dir);
    let removed = cache.purge_expired()?;
    println!(
        "Removed {} expired entries from {}",
        removed,
        cache.dir().display()
    );
    Ok(removed)
}

// ============================================================================
// Builders (merge CLI args with config file)
// ============================================================================

/// Cache from config, with the CLI directory taking precedence.
///
/// A non-positive or out-of-range `ttl_hours` falls back to the default.
pub fn build_cache(config: &AppConfig, cache_dir: Option<&str>) -> CacheManager {
    let dir = cache_dir.unwrap_or(&config.cache.dir);
    let ttl = TimeDelta::try_hours(config.cache.ttl_hours)
        .filter(|ttl| *ttl > TimeDelta::zero())
        .unwrap_or_else(|| {
            warn!(
                ttl_hours = config.cache.ttl_hours,
                default = DEFAULT_TTL_HOURS,
                "invalid cache ttl_hours; using default"
            );
            TimeDelta::hours(DEFAULT_TTL_HOURS)
        });
    CacheManager::new(dir).with_ttl(ttl)
}

/// Analyzer from config; no cache when caching is disabled in the config.
pub fn build_analyzer(config: &AppConfig, cache_dir: Option<&str>) -> PageAnalyzer {
    let analyzer = PageAnalyzer::new().with_policy(config.synthesis.clone());
    if config.cache.enabled {
        analyzer.with_cache(build_cache(config, cache_dir))
    } else {
        analyzer
    }
}
