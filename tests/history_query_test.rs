//! History query service tests against a mock database.
//!
//! Run with: cargo test --test history_query_test

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, Value, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use fillpoint::entity::{station_history, stations};
use fillpoint::error::AppError;
use fillpoint::service::history::{MAX_PAGE_SIZE, get_history, list_history};

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

fn station(name: &str) -> stations::Model {
    stations::Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        volume_percentage: 50.0,
        collection_requested: false,
        created_at: now(),
        updated_at: now(),
    }
}

fn record(station_id: Uuid, operation: &str, volume: f64) -> station_history::Model {
    station_history::Model {
        id: Uuid::new_v4(),
        station_id,
        operation_type: operation.to_string(),
        volume_percentage: volume,
        timestamp: now(),
        notes: None,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn list_returns_envelope_with_denormalized_station_names() {
    let owner = station("Station A");
    let rows = vec![
        (record(owner.id, "update", 85.0), owner.clone()),
        (record(owner.id, "create", 50.0), owner.clone()),
    ];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(2)]])
        .append_query_results([rows])
        .into_connection();

    let page = list_history(&db, None, 1, 50).await.unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 50);
    assert_eq!(page.records.len(), 2);
    for (_, related) in &page.records {
        assert_eq!(related.as_ref().map(|s| s.name.as_str()), Some("Station A"));
    }

    // Newest-first ordering is the database's job; pin the query shape.
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("DESC"));
}

#[tokio::test]
async fn list_with_station_filter_restricts_query() {
    let owner = station("Station B");
    let rows = vec![(record(owner.id, "create", 0.0), owner.clone())];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([rows])
        .into_connection();

    let page = list_history(&db, Some(owner.id), 1, 50).await.unwrap();
    assert_eq!(page.count, 1);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("WHERE"));
}

#[tokio::test]
async fn list_clamps_page_and_page_size() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(0)]])
        .append_query_results([Vec::<(station_history::Model, stations::Model)>::new()])
        .into_connection();

    let page = list_history(&db, None, 0, 10_000).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, MAX_PAGE_SIZE);
    assert!(page.records.is_empty());
}

#[tokio::test]
async fn get_returns_record_with_station() {
    let owner = station("Station C");
    let entry = record(owner.id, "collection_complete", 0.0);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(entry.clone(), owner.clone())]])
        .into_connection();

    let (found, related) = get_history(&db, entry.id).await.unwrap();
    assert_eq!(found.operation_type, "collection_complete");
    assert_eq!(related.map(|s| s.name), Some("Station C".to_string()));
}

#[tokio::test]
async fn get_unknown_record_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<(station_history::Model, stations::Model)>::new()])
        .into_connection();

    let err = get_history(&db, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
