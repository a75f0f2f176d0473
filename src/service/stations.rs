use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::station_history::{self, OperationType};
use crate::entity::stations;
use crate::error::{AppError, AppResult};
use crate::validate::validate_volume_percentage;

/// Fill level at or above which a collection request is raised automatically.
pub const COLLECTION_THRESHOLD: f64 = 80.0;

/// Partial update of a station. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct StationChanges {
    pub name: Option<String>,
    pub volume_percentage: Option<f64>,
}

/// Create a station and record the `create` operation in its history.
///
/// Both rows commit in one transaction.
///
/// # Errors
///
/// Returns a validation error for an out-of-range fill level or a duplicate
/// name, or a database error.
pub async fn create_station<C>(db: &C, name: String, volume_percentage: f64) -> AppResult<stations::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let volume = validate_volume_percentage(volume_percentage)?;
    let now = Utc::now();

    let txn = db.begin().await?;

    let station = stations::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        volume_percentage: Set(volume),
        collection_requested: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let station = station.insert(&txn).await.map_err(map_name_conflict)?;

    record_operation(
        &txn,
        station.id,
        OperationType::Create,
        volume,
        "station created".to_string(),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(station = %station.name, volume = station.volume_percentage, "Station created");
    Ok(station)
}

/// Apply a partial update to a station and record it in its history.
///
/// Captures the previous fill level for the history note before the change
/// is applied. If the new fill level reaches [`COLLECTION_THRESHOLD`] while
/// no collection is pending, the station is flagged and a second
/// `collection_request` history row is written. The flag suppresses further
/// requests until a collection is confirmed, regardless of intermediate dips
/// below the threshold.
///
/// The station row and its history row(s) commit in one transaction.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, a validation error for an
/// out-of-range fill level or duplicate name, or a database error.
pub async fn update_station<C>(db: &C, id: Uuid, changes: StationChanges) -> AppResult<stations::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    if let Some(volume) = changes.volume_percentage {
        validate_volume_percentage(volume)?;
    }

    let txn = db.begin().await?;

    let station = stations::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Station '{id}' not found")))?;

    let old_volume = station.volume_percentage;
    let new_volume = changes.volume_percentage.unwrap_or(old_volume);
    let crossed = new_volume >= COLLECTION_THRESHOLD && !station.collection_requested;

    let mut active: stations::ActiveModel = station.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    active.volume_percentage = Set(new_volume);
    if crossed {
        active.collection_requested = Set(true);
    }
    active.updated_at = Set(Utc::now().into());
    let station = active.update(&txn).await.map_err(map_name_conflict)?;

    record_operation(
        &txn,
        station.id,
        OperationType::Update,
        new_volume,
        format!("volume updated from {old_volume}% to {new_volume}%"),
    )
    .await?;

    if crossed {
        record_operation(
            &txn,
            station.id,
            OperationType::CollectionRequest,
            new_volume,
            "collection request auto-generated".to_string(),
        )
        .await?;
        tracing::info!(station = %station.name, volume = new_volume, "Collection request auto-generated");
    }

    txn.commit().await?;

    Ok(station)
}

/// Confirm that a pending collection happened: reset the fill level to 0,
/// clear the flag, and record the `collection_complete` operation.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, `InvalidState` if no collection
/// request is pending (nothing is written in that case), or a database
/// error.
pub async fn confirm_collection<C>(db: &C, id: Uuid) -> AppResult<stations::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let station = stations::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Station '{id}' not found")))?;

    if !station.collection_requested {
        tracing::debug!(station = %station.name, "Collection confirmation rejected, no request pending");
        return Err(AppError::InvalidState(
            "no collection request pending".to_string(),
        ));
    }

    let old_volume = station.volume_percentage;

    let mut active: stations::ActiveModel = station.into();
    active.volume_percentage = Set(0.0);
    active.collection_requested = Set(false);
    active.updated_at = Set(Utc::now().into());
    let station = active.update(&txn).await?;

    record_operation(
        &txn,
        station.id,
        OperationType::CollectionComplete,
        0.0,
        format!("collection confirmed; previous volume: {old_volume}%"),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(station = %station.name, previous_volume = old_volume, "Collection confirmed");
    Ok(station)
}

/// Delete a station. History rows go with it via the FK cascade; no history
/// is written for the deletion itself.
///
/// # Errors
///
/// Returns `NotFound` if no station with `id` exists, or a database error.
pub async fn delete_station<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = stations::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Station '{id}' not found")));
    }
    tracing::info!(station_id = %id, "Station deleted");
    Ok(())
}

async fn record_operation<C: ConnectionTrait>(
    db: &C,
    station_id: Uuid,
    operation: OperationType,
    volume: f64,
    notes: String,
) -> AppResult<station_history::Model> {
    let entry = station_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        station_id: Set(station_id),
        operation_type: Set(operation.as_str().to_string()),
        volume_percentage: Set(volume),
        timestamp: Set(Utc::now().into()),
        notes: Set(Some(notes)),
    };
    Ok(entry.insert(db).await?)
}

fn map_name_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Validation {
            field: "name",
            message: "A station with this name already exists.".to_string(),
        },
        _ => AppError::Database(err),
    }
}
