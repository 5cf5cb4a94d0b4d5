mod common;

use std::sync::Arc;
use std::thread;

use chrono::{TimeDelta, TimeZone, Utc};
use page_testgen::analysis::result::AnalysisResult;
use page_testgen::cache::cache_manager::{CacheEntry, CacheManager};
use page_testgen::cache::clock::{Clock, ManualClock};
use page_testgen::{CacheError, analyze_page};

use common::utils::{LOGIN_FORM, LOGIN_URL};

fn sample_result() -> AnalysisResult {
    analyze_page(LOGIN_FORM, LOGIN_URL).unwrap()
}

fn manual_cache(dir: &std::path::Path) -> (CacheManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
    ));
    let cache = CacheManager::new(dir).with_clock(clock.clone());
    (cache, clock)
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn key_is_sha256_hex() {
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    assert_eq!(key.as_str().len(), 64);
    assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn key_of_empty_input_is_the_empty_digest() {
    assert_eq!(
        CacheManager::key("", "").as_str(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn key_depends_on_url_and_markup() {
    let base = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    assert_eq!(base, CacheManager::key(LOGIN_URL, LOGIN_FORM));
    assert_ne!(base, CacheManager::key("https://example.com/other", LOGIN_FORM));
    assert_ne!(base, CacheManager::key(LOGIN_URL, "<html></html>"));
}

// ============================================================================
// Lookup and store
// ============================================================================

#[test]
fn lookup_on_empty_cache_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(dir.path().join("missing"));
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    assert!(cache.lookup(&key).unwrap().is_none());
}

#[test]
fn stored_result_is_returned_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(dir.path().join("nested").join("cache"));
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    let result = sample_result();

    cache.store(&key, &result).unwrap();

    assert!(cache.dir().join(format!("{}.json", key)).exists());
    assert_eq!(cache.lookup(&key).unwrap(), Some(result));
}

#[test]
fn store_replaces_previous_entry() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    let first = sample_result();
    let mut second = first.clone();
    second.pom_code.push_str("// revised\n");

    cache.store(&key, &first).unwrap();
    cache.store(&key, &second).unwrap();

    assert_eq!(cache.lookup(&key).unwrap(), Some(second));
    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 1, "temporary files must not be left behind");
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn entry_just_inside_ttl_is_a_hit() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::hours(23) + TimeDelta::minutes(59));

    assert!(cache.lookup(&key).unwrap().is_some());
}

#[test]
fn entry_past_ttl_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::hours(24) + TimeDelta::minutes(1));

    assert!(cache.lookup(&key).unwrap().is_none());
    assert!(!dir.path().join(format!("{}.json", key)).exists());
}

#[test]
fn entry_exactly_at_ttl_is_expired() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::hours(24));

    assert!(cache.lookup(&key).unwrap().is_none());
}

#[test]
fn entry_stamped_in_the_future_is_expired() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::hours(-1));

    assert!(cache.lookup(&key).unwrap().is_none());
    assert!(!dir.path().join(format!("{}.json", key)).exists());
}

#[test]
fn purge_removes_entries_from_the_future() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());

    cache
        .store(&CacheManager::key(LOGIN_URL, LOGIN_FORM), &sample_result())
        .unwrap();
    clock.set(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

    assert_eq!(cache.purge_expired().unwrap(), 1);
}

#[test]
fn custom_ttl_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let cache = cache.with_ttl(TimeDelta::minutes(5));
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::minutes(4));
    assert!(cache.lookup(&key).unwrap().is_some());
    clock.advance(TimeDelta::minutes(2));
    assert!(cache.lookup(&key).unwrap().is_none());
}

#[test]
fn restore_after_expiry_refreshes_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::hours(30));
    cache.store(&key, &sample_result()).unwrap();
    clock.advance(TimeDelta::hours(1));

    assert!(cache.lookup(&key).unwrap().is_some());
}

// ============================================================================
// Damaged entries
// ============================================================================

#[test]
fn corrupt_entry_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    std::fs::write(dir.path().join(format!("{}.json", key)), "{ not json").unwrap();

    let err = cache.lookup(&key).unwrap_err();
    assert!(matches!(err, CacheError::Corrupt { .. }));
}

#[test]
fn entry_with_mismatched_key_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);

    let entry = CacheEntry {
        key: "0".repeat(64),
        timestamp: clock.now(),
        payload: sample_result(),
    };
    std::fs::write(
        dir.path().join(format!("{}.json", key)),
        serde_json::to_vec(&entry).unwrap(),
    )
    .unwrap();

    assert!(cache.lookup(&key).unwrap().is_none());
}

// ============================================================================
// Purge
// ============================================================================

#[test]
fn purge_removes_only_expired_entries() {
    let dir = tempfile::tempdir().unwrap();
    let (cache, clock) = manual_cache(dir.path());
    let result = sample_result();

    let old_a = CacheManager::key("https://example.com/a", LOGIN_FORM);
    let old_b = CacheManager::key("https://example.com/b", LOGIN_FORM);
    let fresh = CacheManager::key("https://example.com/c", LOGIN_FORM);

    cache.store(&old_a, &result).unwrap();
    cache.store(&old_b, &result).unwrap();
    clock.advance(TimeDelta::hours(25));
    cache.store(&fresh, &result).unwrap();

    std::fs::write(dir.path().join("garbage.json"), "nope").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

    assert_eq!(cache.purge_expired().unwrap(), 2);
    assert!(cache.lookup(&fresh).unwrap().is_some());
    assert!(dir.path().join("garbage.json").exists());
    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn purge_of_missing_directory_removes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(dir.path().join("never-created"));
    assert_eq!(cache.purge_expired().unwrap(), 0);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_store_and_lookup_never_see_partial_entries() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(CacheManager::new(dir.path()));
    let key = CacheManager::key(LOGIN_URL, LOGIN_FORM);
    let result = sample_result();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            let result = result.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    if i % 2 == 0 {
                        cache.store(&key, &result).unwrap();
                    } else if let Some(found) = cache.lookup(&key).unwrap() {
                        assert_eq!(found, result);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.lookup(&key).unwrap(), Some(result));
}
