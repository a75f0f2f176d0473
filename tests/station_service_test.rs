//! Station service tests against a mock database.
//!
//! The mock hands back the queued rows, so these tests pin down the shape of
//! the conversation with the database: which statements run, in what order,
//! and which history notes get written. A missing queued result fails the
//! test, so "exactly one history row" is enforced by queueing exactly one.
//!
//! Run with: cargo test --test station_service_test

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use fillpoint::entity::{station_history, stations};
use fillpoint::error::AppError;
use fillpoint::service::stations::{
    COLLECTION_THRESHOLD, StationChanges, confirm_collection, create_station, delete_station,
    update_station,
};

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

fn station(volume: f64, requested: bool) -> stations::Model {
    stations::Model {
        id: Uuid::new_v4(),
        name: "Test Station".to_string(),
        volume_percentage: volume,
        collection_requested: requested,
        created_at: now(),
        updated_at: now(),
    }
}

fn history(station_id: Uuid, operation: &str, volume: f64, notes: &str) -> station_history::Model {
    station_history::Model {
        id: Uuid::new_v4(),
        station_id,
        operation_type: operation.to_string(),
        volume_percentage: volume,
        timestamp: now(),
        notes: Some(notes.to_string()),
    }
}

#[tokio::test]
async fn create_writes_station_and_create_history() {
    let created = station(50.0, false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![created.clone()]])
        .append_query_results([vec![history(
            created.id,
            "create",
            50.0,
            "station created",
        )]])
        .into_connection();

    let result = create_station(&db, "Test Station".to_string(), 50.0)
        .await
        .unwrap();
    assert_eq!(result.volume_percentage, 50.0);
    assert!(!result.collection_requested);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("station created"));
}

#[tokio::test]
async fn create_rejects_out_of_range_volume_before_touching_db() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = create_station(&db, "Test Station".to_string(), 120.0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation {
            field: "volume_percentage",
            ..
        }
    ));

    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn update_below_threshold_writes_single_update_record() {
    let existing = station(50.0, false);
    let mut updated = existing.clone();
    updated.volume_percentage = 75.0;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![updated]])
        .append_query_results([vec![history(
            existing.id,
            "update",
            75.0,
            "volume updated from 50% to 75%",
        )]])
        .into_connection();

    let result = update_station(
        &db,
        existing.id,
        StationChanges {
            name: None,
            volume_percentage: Some(75.0),
        },
    )
    .await
    .unwrap();
    assert_eq!(result.volume_percentage, 75.0);
    assert!(!result.collection_requested);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("volume updated from 50% to 75%"));
    assert!(!log.contains("collection request auto-generated"));
}

#[tokio::test]
async fn update_crossing_threshold_flags_station_and_writes_request_record() {
    let existing = station(50.0, false);
    let mut updated = existing.clone();
    updated.volume_percentage = 85.0;
    updated.collection_requested = true;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![updated]])
        .append_query_results([vec![history(
            existing.id,
            "update",
            85.0,
            "volume updated from 50% to 85%",
        )]])
        .append_query_results([vec![history(
            existing.id,
            "collection_request",
            85.0,
            "collection request auto-generated",
        )]])
        .into_connection();

    let result = update_station(
        &db,
        existing.id,
        StationChanges {
            name: None,
            volume_percentage: Some(85.0),
        },
    )
    .await
    .unwrap();
    assert!(result.collection_requested);
    assert!(result.volume_percentage >= COLLECTION_THRESHOLD);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("collection request auto-generated"));
}

#[tokio::test]
async fn update_while_already_flagged_suppresses_second_request() {
    let existing = station(90.0, true);
    let mut updated = existing.clone();
    updated.volume_percentage = 95.0;

    // Only one history result is queued; a second collection_request insert
    // would come back empty and fail the call.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![updated]])
        .append_query_results([vec![history(
            existing.id,
            "update",
            95.0,
            "volume updated from 90% to 95%",
        )]])
        .into_connection();

    let result = update_station(
        &db,
        existing.id,
        StationChanges {
            name: None,
            volume_percentage: Some(95.0),
        },
    )
    .await
    .unwrap();
    assert!(result.collection_requested);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("collection request auto-generated"));
}

#[tokio::test]
async fn update_unknown_station_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<stations::Model>::new()])
        .into_connection();

    let err = update_station(
        &db,
        Uuid::new_v4(),
        StationChanges {
            name: None,
            volume_percentage: Some(10.0),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn confirm_without_pending_request_writes_nothing() {
    let existing = station(50.0, false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .into_connection();

    let err = confirm_collection(&db, existing.id).await.unwrap_err();
    match err {
        AppError::InvalidState(msg) => assert_eq!(msg, "no collection request pending"),
        other => panic!("expected invalid state error, got {other:?}"),
    }

    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("INSERT"));
    assert!(!log.contains("UPDATE"));
}

#[tokio::test]
async fn confirm_resets_volume_and_writes_complete_record() {
    let existing = station(85.0, true);
    let mut reset = existing.clone();
    reset.volume_percentage = 0.0;
    reset.collection_requested = false;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![reset]])
        .append_query_results([vec![history(
            existing.id,
            "collection_complete",
            0.0,
            "collection confirmed; previous volume: 85%",
        )]])
        .into_connection();

    let result = confirm_collection(&db, existing.id).await.unwrap();
    assert_eq!(result.volume_percentage, 0.0);
    assert!(!result.collection_requested);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("collection confirmed; previous volume: 85%"));
}

#[tokio::test]
async fn delete_removes_existing_station() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    delete_station(&db, Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn delete_unknown_station_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let err = delete_station(&db, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
