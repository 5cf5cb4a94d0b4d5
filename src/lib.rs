//! Turn the markup of a web page into test cases and a Playwright page
//! object.
//!
//! The pipeline runs extract → classify → synthesize + generate, memoized by
//! a content-addressed cache with time-based expiry. Use
//! [`PageAnalyzer`](analysis::analyzer::PageAnalyzer) for the cached
//! pipeline or the stage functions directly.

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod generator;
pub mod report;
pub mod screen;
pub mod spec;

pub use analysis::analyzer::{PageAnalyzer, analyze_page};
pub use analysis::error::{AnalysisError, CacheError};
pub use analysis::result::{Analysis, AnalysisResult, CacheStatus};
pub use cache::cache_manager::CacheManager;
pub use screen::screen_model::PageInventory;
pub use spec::spec_model::TestCaseSpec;
