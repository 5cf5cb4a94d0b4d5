use std::time::Instant;

use tracing::{info, warn};
use url::Url;

use crate::analysis::error::AnalysisError;
use crate::analysis::result::{Analysis, AnalysisMetadata, AnalysisResult, CacheStatus};
use crate::cache::cache_manager::CacheManager;
use crate::generator::pom::{generate, sanitize_identifier};
use crate::generator::test_generator::synthesize_with;
use crate::screen::classifier::classify;
use crate::screen::extractor::extract_from;
use crate::spec::boundary::BoundaryPolicy;

// ============================================================================
// PageAnalyzer — extract, classify, synthesize, generate, behind the cache
// ============================================================================

/// Runs the analysis pipeline, memoized by an optional `CacheManager`.
///
/// Safe to share between threads; concurrent analyses of the same page may
/// both compute and both store.
pub struct PageAnalyzer {
    cache: Option<CacheManager>,
    policy: BoundaryPolicy,
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAnalyzer {
    /// An analyzer without a cache.
    pub fn new() -> Self {
        Self {
            cache: None,
            policy: BoundaryPolicy::default(),
        }
    }

    pub fn with_cache(mut self, cache: CacheManager) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cache(&self) -> Option<&CacheManager> {
        self.cache.as_ref()
    }

    /// Analyze a page. See [`PageAnalyzer::analyze_detailed`].
    pub fn analyze(
        &self,
        markup: &str,
        source_url: &str,
        use_cache: bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_detailed(markup, source_url, use_cache)
            .map(|analysis| analysis.result)
    }

    /// Analyze a page and report how the cache was used.
    ///
    /// Input is validated before the cache is consulted. Cache failures are
    /// logged and reflected in `CacheStatus`; they never fail the call.
    pub fn analyze_detailed(
        &self,
        markup: &str,
        source_url: &str,
        use_cache: bool,
    ) -> Result<Analysis, AnalysisError> {
        let url = validate_input(markup, source_url)?;

        let Some(cache) = self.cache.as_ref().filter(|_| use_cache) else {
            return Ok(Analysis {
                result: self.run(markup, source_url, &url)?,
                cache: CacheStatus::Bypassed,
            });
        };

        let key = CacheManager::key(source_url, markup);
        let mut status = CacheStatus::Miss;

        match cache.lookup(&key) {
            Ok(Some(result)) => {
                info!(url = source_url, "using cached result");
                return Ok(Analysis {
                    result,
                    cache: CacheStatus::Hit,
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed; recomputing");
                status = CacheStatus::ReadFailed(e.to_string());
            }
        }

        let result = self.run(markup, source_url, &url)?;

        if let Err(e) = cache.store(&key, &result) {
            warn!(key = %key, error = %e, "cache write failed");
            status = CacheStatus::WriteFailed(e.to_string());
        }

        Ok(Analysis {
            result,
            cache: status,
        })
    }

    fn run(&self, markup: &str, source_url: &str, url: &Url) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();

        let inventory = classify(extract_from(markup, Some(url))?);
        let test_cases = synthesize_with(&inventory, &self.policy);
        let page_name = page_name_for(url);
        let pom_code = generate(&inventory, &page_name);
        let element_counts = inventory.element_counts();

        let analysis_duration_ms = started.elapsed().as_millis() as u64;
        info!(
            url = source_url,
            forms = element_counts.forms,
            links = element_counts.links,
            test_cases = test_cases.len(),
            duration_ms = analysis_duration_ms,
            "analysis complete"
        );

        Ok(AnalysisResult {
            test_cases,
            pom_code,
            metadata: AnalysisMetadata {
                element_counts,
                analysis_duration_ms,
                source_url: source_url.to_string(),
                page_object: sanitize_identifier(&page_name),
            },
        })
    }
}

/// Analyze a page without caching.
pub fn analyze_page(markup: &str, source_url: &str) -> Result<AnalysisResult, AnalysisError> {
    PageAnalyzer::new().analyze(markup, source_url, false)
}

fn validate_input(markup: &str, source_url: &str) -> Result<Url, AnalysisError> {
    if markup.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("markup is empty".into()));
    }
    if source_url.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("source URL is empty".into()));
    }
    Url::parse(source_url.trim()).map_err(|e| {
        AnalysisError::InvalidInput(format!("malformed URL '{}': {}", source_url, e))
    })
}

/// Page name from the last path segment without extension, e.g.
/// `https://example.com/account/login.html` → `loginPage`; `HomePage` for
/// the site root.
pub fn page_name_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|segment| segment.split('.').next().unwrap_or(segment))
        .filter(|stem| !stem.is_empty())
        .map(|stem| format!("{}Page", stem))
        .unwrap_or_else(|| "HomePage".to_string())
}
