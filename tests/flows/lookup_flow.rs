#[path = "../common/mod.rs"]
mod common;

use common::{memory_store, sqlite_store, Engine, MockUpstream, Zone};
use ferrous_lookup_application::use_cases::InspectedEntry;
use ferrous_lookup_domain::{LookupStatus, RecordType};
use futures::future::join_all;

fn zone() -> Zone {
    Zone::new()
        .a("example.com", 300, "93.184.216.34")
        .a("example.com", 120, "93.184.216.35")
        .mx("example.com", 3600, 10, "mail.example.com.")
        .txt("example.com", 600, &["v=spf1 ", "-all"])
        .cname("www.example.com", 60, "example.com.")
        .a("api.example.com", 30, "10.1.0.1")
        .a("cdn.example.com", 30, "10.1.0.2")
}

// ============================================================================
// Positive caching
// ============================================================================

#[tokio::test]
async fn test_miss_then_hit() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    let first = engine.lookup("example.com", RecordType::A).await;
    assert_eq!(first.status, LookupStatus::Miss);
    assert_eq!(
        first.records().unwrap(),
        &["93.184.216.34".to_string(), "93.184.216.35".to_string()]
    );
    assert_eq!(first.ttl_seconds, 120, "answer TTL is the minimum record TTL");

    let second = engine.lookup("example.com", RecordType::A).await;
    assert_eq!(second.status, LookupStatus::Hit);
    assert_eq!(second.records(), first.records());
    assert!(second.ttl_seconds >= 119 && second.ttl_seconds <= 120);

    assert_eq!(upstream.queries(), 1);
}

#[tokio::test]
async fn test_case_and_trailing_dot_share_one_entry() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    engine.lookup("example.com", RecordType::A).await;
    let again = engine.lookup("EXAMPLE.com.", RecordType::A).await;

    assert_eq!(again.status, LookupStatus::Hit);
    assert_eq!(upstream.queries(), 1);
}

#[tokio::test]
async fn test_record_rendering() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    let mx = engine.lookup("example.com", RecordType::MX).await;
    assert_eq!(mx.records().unwrap(), &["10 mail.example.com".to_string()]);

    let txt = engine.lookup("example.com", RecordType::TXT).await;
    assert_eq!(txt.records().unwrap(), &["v=spf1 -all".to_string()]);

    let cname = engine.lookup("www.example.com", RecordType::CNAME).await;
    assert_eq!(cname.records().unwrap(), &["example.com".to_string()]);
}

#[tokio::test]
async fn test_types_are_cached_independently() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    engine.lookup("example.com", RecordType::A).await;
    let mx = engine.lookup("example.com", RecordType::MX).await;

    assert_eq!(mx.status, LookupStatus::Miss);
    assert_eq!(upstream.queries(), 2);
}

// ============================================================================
// Negative caching
// ============================================================================

#[tokio::test]
async fn test_nxdomain_is_cached_as_negative() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    let first = engine.lookup("missing.example.com", RecordType::A).await;
    assert_eq!(first.status, LookupStatus::MissNegative);
    assert_eq!(first.ttl_seconds, 60);
    assert_eq!(
        first.failure().unwrap().error,
        "A record not found for missing.example.com (Error: NXDOMAIN)"
    );

    let second = engine.lookup("missing.example.com", RecordType::A).await;
    assert_eq!(second.status, LookupStatus::HitNegative);
    assert_eq!(second.failure().unwrap().error, "A record not found (Cached)");
    assert!(second.ttl_seconds >= 59 && second.ttl_seconds <= 60);

    assert_eq!(upstream.queries(), 1);
}

#[tokio::test]
async fn test_missing_type_is_cached_as_no_answer() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    let result = engine.lookup("api.example.com", RecordType::AAAA).await;
    assert_eq!(result.status, LookupStatus::MissNegative);
    assert!(result.failure().unwrap().error.ends_with("(Error: NoAnswer)"));

    let entries = engine.inspect.execute("api.example.com").await.unwrap();
    let negative = entries
        .iter()
        .find(|e| e.record_type == RecordType::AAAA)
        .expect("negative marker for AAAA");
    assert_eq!(negative.key, "dns:nx:api.example.com:AAAA");
    assert_eq!(
        negative.entry,
        InspectedEntry::Negative {
            marker: "NoAnswer".to_string()
        }
    );
}

// ============================================================================
// Shared store
// ============================================================================

#[tokio::test]
async fn test_sqlite_store_is_shared_between_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let upstream = MockUpstream::start(zone()).await;

    let writer = Engine::new(sqlite_store(&path).await, &[upstream.addr()]);
    let reader = Engine::new(sqlite_store(&path).await, &[upstream.addr()]);

    let miss = writer.lookup("example.com", RecordType::MX).await;
    assert_eq!(miss.status, LookupStatus::Miss);

    let hit = reader.lookup("example.com", RecordType::MX).await;
    assert_eq!(hit.status, LookupStatus::Hit);
    assert_eq!(hit.records(), miss.records());
    assert_eq!(upstream.queries(), 1);
}

#[tokio::test]
async fn test_inspect_lists_positive_entries() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(
        sqlite_store(&dir.path().join("cache.db")).await,
        &[upstream.addr()],
    );

    engine.lookup("example.com", RecordType::A).await;
    engine.lookup("example.com", RecordType::TXT).await;

    let entries = engine.inspect.execute("Example.COM").await.unwrap();
    let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["dns:cache:example.com:A", "dns:cache:example.com:TXT"]);

    match &entries[0].entry {
        InspectedEntry::Positive { records, .. } => assert_eq!(records.len(), 2),
        other => panic!("expected a positive entry, got {:?}", other),
    }
    assert!(entries[0].ttl_seconds.is_some());

    let json = serde_json::to_value(&entries[1]).unwrap();
    assert_eq!(json["kind"], "positive");
    assert_eq!(json["record_type"], "TXT");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_lookups_of_distinct_names() {
    let upstream = MockUpstream::start(zone()).await;
    let engine = Engine::new(memory_store(), &[upstream.addr()]);

    let domains = ["example.com", "api.example.com", "cdn.example.com", "nope.example.com"];
    let results = join_all(
        domains
            .iter()
            .map(|domain| engine.lookup(domain, RecordType::A)),
    )
    .await;

    assert_eq!(results[0].status, LookupStatus::Miss);
    assert_eq!(results[1].records().unwrap(), &["10.1.0.1".to_string()]);
    assert_eq!(results[2].records().unwrap(), &["10.1.0.2".to_string()]);
    assert_eq!(results[3].status, LookupStatus::MissNegative);

    for domain in domains {
        assert!(engine.lookup(domain, RecordType::A).await.status.from_cache());
    }
    assert_eq!(upstream.queries(), 4);
}
