mod common;

use page_testgen::analysis::analyzer::page_name_for;
use page_testgen::spec::boundary::BoundaryPolicy;
use page_testgen::spec::spec_model::Priority;
use page_testgen::{AnalysisError, CacheManager, CacheStatus, PageAnalyzer, analyze_page};
use url::Url;

use common::utils::{LOGIN_FORM, LOGIN_URL, fixture};

fn cached_analyzer(dir: &std::path::Path) -> PageAnalyzer {
    PageAnalyzer::new().with_cache(CacheManager::new(dir))
}

// ============================================================================
// Input validation
// ============================================================================

#[test]
fn empty_markup_is_rejected_before_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let analyzer = cached_analyzer(&cache_dir);

    let err = analyzer.analyze("   ", LOGIN_URL, true).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput(_)));
    assert!(!cache_dir.exists());
}

#[test]
fn empty_or_malformed_url_is_rejected() {
    let analyzer = PageAnalyzer::new();
    assert!(matches!(
        analyzer.analyze(LOGIN_FORM, "", false),
        Err(AnalysisError::InvalidInput(_))
    ));
    assert!(matches!(
        analyzer.analyze(LOGIN_FORM, "not a url", false),
        Err(AnalysisError::InvalidInput(_))
    ));
}

#[test]
fn markup_without_tags_is_a_parsing_error() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = cached_analyzer(dir.path());

    let err = analyzer.analyze("hello world", LOGIN_URL, true).unwrap_err();
    assert!(matches!(err, AnalysisError::Parsing(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ============================================================================
// Pipeline output
// ============================================================================

#[test]
fn login_scenario_end_to_end() {
    let result = analyze_page(LOGIN_FORM, LOGIN_URL).unwrap();

    assert!(
        result
            .test_cases
            .iter()
            .any(|c| c.priority == Priority::High && c.title.starts_with("Submit"))
    );
    assert!(result.test_cases.iter().any(|c| c.priority == Priority::Medium));
    assert!(result.pom_code.contains("export class LoginPage"));
    assert!(result.pom_code.contains("getForm1()"));
    assert!(result.pom_code.contains("fillForm1("));
    assert!(result.pom_code.contains("submitForm1()"));
}

#[test]
fn metadata_describes_the_analysis() {
    let result = analyze_page(&fixture("login.html"), LOGIN_URL).unwrap();
    let meta = &result.metadata;

    assert_eq!(meta.source_url, LOGIN_URL);
    assert_eq!(meta.page_object, "LoginPage");
    assert_eq!(meta.element_counts.forms, 1);
    assert_eq!(meta.element_counts.links, 5);
    assert_eq!(meta.element_counts.images, 3);
}

#[test]
fn empty_page_yields_no_cases_and_a_minimal_module() {
    let result = analyze_page("<html></html>", "https://example.com/").unwrap();
    assert!(result.test_cases.is_empty());
    assert!(result.pom_code.contains("export class HomePage"));
    assert_eq!(result.metadata.page_object, "HomePage");
}

#[test]
fn output_is_deterministic_apart_from_timing() {
    let markup = fixture("login.html");
    let first = analyze_page(&markup, LOGIN_URL).unwrap();
    let second = analyze_page(&markup, LOGIN_URL).unwrap();

    assert_eq!(first.test_cases, second.test_cases);
    assert_eq!(first.pom_code, second.pom_code);
    assert_eq!(first.metadata.element_counts, second.metadata.element_counts);
}

#[test]
fn policy_reaches_the_synthesizer() {
    let policy = BoundaryPolicy {
        empty_value: false,
        over_length: false,
        type_mismatch: false,
        ..BoundaryPolicy::default()
    };
    let result = PageAnalyzer::new()
        .with_policy(policy)
        .analyze(LOGIN_FORM, LOGIN_URL, false)
        .unwrap();
    let happy = result
        .test_cases
        .iter()
        .find(|c| c.priority == Priority::High)
        .unwrap();
    assert!(happy.edge_cases.is_empty());
}

#[test]
fn extreme_length_constraints_do_not_abort_analysis() {
    let markup = format!(
        "<form action=\"/save\">\
         <input name=\"a\" required maxlength=\"{max}\">\
         <input name=\"b\" required minlength=\"{max}\">\
         <input name=\"c\" minlength=\"4000000000\" maxlength=\"8\">\
         <input type=\"submit\"></form>",
        max = usize::MAX
    );
    let result = analyze_page(&markup, LOGIN_URL).unwrap();
    let happy = result
        .test_cases
        .iter()
        .find(|c| c.priority == Priority::High)
        .unwrap();

    let c = happy.steps.iter().find(|s| s.field == "c").unwrap();
    assert_eq!(c.value.as_deref(), Some("testxxxx"));
    assert!(!happy.edge_cases.iter().any(|e| e.starts_with("a: 0 characters")));
}

#[test]
fn page_names_come_from_the_last_path_segment() {
    let name = |u: &str| page_name_for(&Url::parse(u).unwrap());
    assert_eq!(name("https://example.com/login"), "loginPage");
    assert_eq!(name("https://example.com/account/settings.html"), "settingsPage");
    assert_eq!(name("https://example.com/shop/"), "shopPage");
    assert_eq!(name("https://example.com/"), "HomePage");
}

// ============================================================================
// Cache integration
// ============================================================================

#[test]
fn second_analysis_is_a_cache_hit() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = cached_analyzer(dir.path());

    let first = analyzer.analyze_detailed(LOGIN_FORM, LOGIN_URL, true).unwrap();
    assert_eq!(first.cache, CacheStatus::Miss);

    let second = analyzer.analyze_detailed(LOGIN_FORM, LOGIN_URL, true).unwrap();
    assert_eq!(second.cache, CacheStatus::Hit);
    assert_eq!(second.result, first.result);
}

#[test]
fn different_url_is_a_different_entry() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = cached_analyzer(dir.path());

    analyzer.analyze(LOGIN_FORM, LOGIN_URL, true).unwrap();
    let other = analyzer
        .analyze_detailed(LOGIN_FORM, "https://example.com/signin", true)
        .unwrap();
    assert_eq!(other.cache, CacheStatus::Miss);
    assert_eq!(other.result.metadata.page_object, "SigninPage");
}

#[test]
fn cache_is_bypassed_on_request_or_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = cached_analyzer(dir.path());

    let skipped = analyzer.analyze_detailed(LOGIN_FORM, LOGIN_URL, false).unwrap();
    assert_eq!(skipped.cache, CacheStatus::Bypassed);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let uncached = PageAnalyzer::new()
        .analyze_detailed(LOGIN_FORM, LOGIN_URL, true)
        .unwrap();
    assert_eq!(uncached.cache, CacheStatus::Bypassed);
}

#[test]
fn corrupt_entry_is_recomputed_and_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = cached_analyzer(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    std::fs::write(dir.path().join(format!("{}.json", key)), "][").unwrap();

    let recovered = analyzer.analyze_detailed(LOGIN_FORM, LOGIN_URL, true).unwrap();
    assert!(matches!(recovered.cache, CacheStatus::ReadFailed(_)));
    assert!(!recovered.result.test_cases.is_empty());

    let again = analyzer.analyze_detailed(LOGIN_FORM, LOGIN_URL, true).unwrap();
    assert_eq!(again.cache, CacheStatus::Hit);
}

#[test]
fn unwritable_cache_still_returns_the_result() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();
    let analyzer = cached_analyzer(&blocker);

    let analysis = analyzer.analyze_detailed(LOGIN_FORM, LOGIN_URL, true).unwrap();
    assert!(matches!(analysis.cache, CacheStatus::WriteFailed(_)));
    assert_eq!(analysis.result, {
        let mut expected = analyze_page(LOGIN_FORM, LOGIN_URL).unwrap();
        expected.metadata.analysis_duration_ms = analysis.result.metadata.analysis_duration_ms;
        expected
    });
}
