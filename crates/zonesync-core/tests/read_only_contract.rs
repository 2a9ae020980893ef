//! Contract Test: Read-Only Commands
//!
//! Constraints verified:
//! - Comparison never mutates the provider
//! - A domain whose fetch fails is skipped, the rest are still compared
//! - Generation writes parseable zone files that compare as fully matching
//! - Generation skips domains whose file cannot be written, and never writes
//!   outside the zone directory
//! - A missing zone directory is reported, not panicked on

mod common;

use common::*;
use zonesync_core::diff::DiffStatus;
use zonesync_core::{Comparer, Error, Generator, ZoneDirectory};

#[tokio::test]
async fn compare_classifies_and_does_not_mutate() {
    let dir = zone_dir(&[(
        "example.com",
        "@ 3600 IN A 1.1.1.1\nwww 300 IN CNAME example.com.\n",
    )]);
    let zones = ZoneDirectory::open(dir.path()).await.unwrap();
    let provider = MockDnsProvider::new().with_domain(
        "example.com",
        &[
            ("1", "", "3600", "A", "1.1.1.1"),
            ("2", "www", "600", "CNAME", "example.com."),
            ("3", "old", "300", "A", "9.9.9.9"),
        ],
    );

    let report = Comparer::new(Box::new(provider.clone()))
        .compare_all(&zones)
        .await
        .unwrap();

    assert!(provider.mutating_calls().is_empty());
    assert_eq!(report.with_status(DiffStatus::Matching).count(), 1);
    assert_eq!(report.with_status(DiffStatus::LocalOnly).count(), 1);
    assert_eq!(report.with_status(DiffStatus::RemoteOnly).count(), 2);
}

#[tokio::test]
async fn compare_skips_unfetchable_domains() {
    let dir = zone_dir(&[
        ("a.com", "@ 300 IN A 1.1.1.1\n"),
        ("b.com", "@ 300 IN A 2.2.2.2\n"),
    ]);
    let zones = ZoneDirectory::open(dir.path()).await.unwrap();
    // b.com is unknown to the provider, so its fetch fails
    let provider = MockDnsProvider::new().with_domain("a.com", &[("1", "", "300", "A", "1.1.1.1")]);

    let report = Comparer::new(Box::new(provider)).compare_all(&zones).await.unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].domain, "a.com");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "b.com");
}

#[tokio::test]
async fn generated_zones_compare_as_matching() {
    let provider = MockDnsProvider::new()
        .with_domain(
            "example.com",
            &[
                ("1", "", "3600", "A", "1.1.1.1"),
                ("2", "www", "300", "CNAME", "example.com."),
                ("3", "", "3600", "MX", "10 mx.example.com."),
            ],
        )
        .with_domain("empty.org", &[]);
    let dir = tempfile::tempdir().unwrap();
    let zones = ZoneDirectory::create(dir.path().join("zone")).await.unwrap();

    let written = Generator::new(Box::new(provider.clone()))
        .generate_all(&zones)
        .await
        .unwrap();

    assert_eq!(written, vec![zones.path_for("example.com")]);

    let report = Comparer::new(Box::new(provider)).compare_all(&zones).await.unwrap();
    assert_eq!(report.rows.len(), 3);
    assert!(report.rows.iter().all(|row| row.status == DiffStatus::Matching));
}

#[tokio::test]
async fn missing_zone_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = ZoneDirectory::open(dir.path().join("zone")).await.unwrap_err();
    assert!(matches!(err, Error::ZoneDirMissing(_)));
}

#[tokio::test]
async fn generation_skips_unwritable_domains() {
    let provider = MockDnsProvider::new()
        .with_domain("../escape.com", &[("1", "", "300", "A", "6.6.6.6")])
        .with_domain("example.com", &[("2", "", "300", "A", "1.1.1.1")]);
    let dir = tempfile::tempdir().unwrap();
    let zones = ZoneDirectory::create(dir.path().join("zone")).await.unwrap();

    let written = Generator::new(Box::new(provider))
        .generate_all(&zones)
        .await
        .unwrap();

    assert_eq!(written, vec![zones.path_for("example.com")]);
    assert!(!dir.path().join("escape.com.zone").exists());
}
