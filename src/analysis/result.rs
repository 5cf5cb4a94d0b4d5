use serde::{Deserialize, Serialize};

use crate::screen::screen_model::ElementCounts;
use crate::spec::spec_model::TestCaseSpec;

/// Everything one analysis produces. This is the unit the cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub test_cases: Vec<TestCaseSpec>,
    pub pom_code: String,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub element_counts: ElementCounts,
    /// Wall-clock time of the uncached pipeline run
    pub analysis_duration_ms: u64,
    pub source_url: String,
    /// Class name of the generated page object
    pub page_object: String,
}

/// How the cache took part in one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Caching disabled for this call or not configured
    Bypassed,
    /// Reading failed; the result was recomputed
    ReadFailed(String),
    /// The result was computed but could not be stored
    WriteFailed(String),
}

/// An analysis result together with its cache outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub cache: CacheStatus,
}
