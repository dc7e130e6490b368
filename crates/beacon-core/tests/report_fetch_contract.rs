//! Architectural Contract Test: Report / Fetch
//!
//! Constraints verified:
//! - An accepted report is returned verbatim by fetch
//! - Rejected reports never touch the stored address
//! - Fetch reports NotFound until the first accepted report
//! - Repeated and successive reports are idempotent / last-write-wins
//!
//! If this test fails, the address registry contract is broken.

mod common;

use beacon_core::Error;
use common::*;

#[tokio::test]
async fn fetch_before_any_report_is_not_found() {
    let registry = registry();

    match registry.fetch().await {
        Err(Error::NotFound(msg)) => assert_eq!(msg, "IP not set"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn accepted_report_is_fetched_verbatim() {
    let candidates = [
        "203.0.113.5",
        "2001:db8::42",
        "198.51.100.1:8080",
        "home.example.net",
        "ünïcödé",
    ];

    for ip in candidates {
        let registry = registry();

        let ack = registry
            .report(Some(SECRET), Some(ip))
            .await
            .expect("report accepted");

        assert_eq!(ack.status, "ok");
        assert_eq!(ack.ip, ip);
        assert_eq!(current(&registry).await.as_deref(), Some(ip));
    }
}

#[tokio::test]
async fn wrong_key_leaves_stored_address_untouched() {
    let (registry, store) = counting_registry();

    registry
        .report(Some(SECRET), Some("203.0.113.5"))
        .await
        .expect("report accepted");
    assert_eq!(store.replace_call_count(), 1);

    for key in [Some("wrong"), Some(""), None, Some("s3cr3t\n")] {
        let result = registry.report(key, Some("1.2.3.4")).await;
        assert!(
            matches!(result, Err(Error::Unauthorized)),
            "key {:?} should be rejected",
            key
        );
    }

    assert_eq!(store.replace_call_count(), 1, "rejected reports must not write");
    assert_eq!(current(&registry).await.as_deref(), Some("203.0.113.5"));
}

#[tokio::test]
async fn unparseable_body_is_unauthorized() {
    let (registry, store) = counting_registry();

    let bodies: [&[u8]; 5] = [b"", b"{", b"key=s3cr3t&ip=1.2.3.4", b"[]", b"{}"];
    for body in bodies {
        let result = registry.report_body(body).await;
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    assert_eq!(store.replace_call_count(), 0);
    assert!(!registry.is_set().await);
}

#[tokio::test]
async fn missing_ip_leaves_stored_address_untouched() {
    let (registry, store) = counting_registry();

    registry
        .report(Some(SECRET), Some("203.0.113.5"))
        .await
        .expect("report accepted");

    for ip in [None, Some("")] {
        match registry.report(Some(SECRET), ip).await {
            Err(Error::BadRequest(msg)) => assert_eq!(msg, "no ip"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    assert_eq!(store.replace_call_count(), 1);
    assert_eq!(current(&registry).await.as_deref(), Some("203.0.113.5"));
}

#[tokio::test]
async fn repeated_identical_reports_are_idempotent() {
    let registry = registry();

    for _ in 0..5 {
        registry
            .report(Some(SECRET), Some("203.0.113.5"))
            .await
            .expect("report accepted");
        assert_eq!(current(&registry).await.as_deref(), Some("203.0.113.5"));
    }
}

#[tokio::test]
async fn later_report_replaces_earlier_one() {
    let registry = registry();

    registry
        .report(Some(SECRET), Some("192.0.2.1"))
        .await
        .expect("first report accepted");
    registry
        .report(Some(SECRET), Some("192.0.2.2"))
        .await
        .expect("second report accepted");

    assert_eq!(current(&registry).await.as_deref(), Some("192.0.2.2"));
}

#[tokio::test]
async fn updated_at_advances_with_each_report() {
    let registry = registry();

    registry
        .report(Some(SECRET), Some("192.0.2.1"))
        .await
        .expect("first report accepted");
    let first = registry.fetch().await.expect("address set");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    registry
        .report(Some(SECRET), Some("192.0.2.1"))
        .await
        .expect("second report accepted");
    let second = registry.fetch().await.expect("address set");

    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.ip, first.ip);
}
