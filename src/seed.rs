use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entity::stations;
use crate::error::AppResult;
use crate::service;

const INITIAL_STATIONS: [&str; 3] = ["Station A", "Station B", "Station C"];

/// Create the initial set of empty stations if the database holds none.
///
/// Stations are created through the station service so each one gets its
/// `create` history entry.
///
/// # Errors
///
/// Returns a database error if the lookup or any insert fails.
pub async fn seed_initial_stations(db: &DatabaseConnection) -> AppResult<()> {
    let existing = stations::Entity::find().count(db).await?;
    if existing > 0 {
        tracing::info!(count = existing, "Stations already present, skipping seed");
        return Ok(());
    }

    for name in INITIAL_STATIONS {
        let station = service::stations::create_station(db, name.to_string(), 0.0).await?;
        tracing::info!(station = %station.name, "Seeded station");
    }

    Ok(())
}
