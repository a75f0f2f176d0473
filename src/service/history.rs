use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entity::{station_history, stations};
use crate::error::{AppError, AppResult};

/// Default number of history records per page.
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Upper bound on the requested page size.
pub const MAX_PAGE_SIZE: u64 = 500;

/// One page of history records, newest first, each joined with its owning
/// station (which may be gone for rows read mid-cascade).
#[derive(Debug)]
pub struct HistoryPage {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub records: Vec<(station_history::Model, Option<stations::Model>)>,
}

/// List history records, newest first, optionally restricted to one station.
///
/// Pages are 1-based; out-of-range sizes are clamped to [`MAX_PAGE_SIZE`].
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_history<C: ConnectionTrait>(
    db: &C,
    station_id: Option<Uuid>,
    page: u64,
    page_size: u64,
) -> AppResult<HistoryPage> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

    let mut query = station_history::Entity::find()
        .find_also_related(stations::Entity)
        .order_by_desc(station_history::Column::Timestamp)
        .order_by_desc(station_history::Column::Id);

    if let Some(station_id) = station_id {
        query = query.filter(station_history::Column::StationId.eq(station_id));
    }

    let paginator = query.paginate(db, page_size);
    let count = paginator.num_items().await?;
    let records = paginator.fetch_page(page - 1).await?;

    Ok(HistoryPage {
        count,
        page,
        page_size,
        records,
    })
}

/// Fetch a single history record with its owning station.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, or a database error.
pub async fn get_history<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<(station_history::Model, Option<stations::Model>)> {
    station_history::Entity::find_by_id(id)
        .find_also_related(stations::Entity)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("History record '{id}' not found")))
}
