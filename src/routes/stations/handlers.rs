use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, QueryOrder};

use crate::common::AppState;
use crate::entity::stations;
use crate::error::AppResult;
use crate::routes::resolve_station;
use crate::service;
use crate::service::stations::StationChanges;

use super::types::{
    ConfirmCollectionResponse, CreateStationRequest, StationResponse, UpdateStationRequest,
};

/// List all stations
#[utoipa::path(
    get,
    path = "/api/stations",
    responses(
        (status = 200, description = "Stations retrieved successfully", body = Vec<StationResponse>),
    ),
    tag = "stations"
)]
pub async fn list_stations(State(state): State<AppState>) -> AppResult<Json<Vec<StationResponse>>> {
    let stations_list = stations::Entity::find()
        .order_by_asc(stations::Column::Name)
        .all(&*state.db)
        .await?;

    let response: Vec<StationResponse> = stations_list
        .into_iter()
        .map(StationResponse::from)
        .collect();

    Ok(Json(response))
}

/// Create a station
///
/// Records a `create` entry in the station's history in the same transaction.
#[utoipa::path(
    post,
    path = "/api/stations",
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = StationResponse),
        (status = 400, description = "Invalid fill level or duplicate name"),
    ),
    tag = "stations"
)]
pub async fn create_station(
    State(state): State<AppState>,
    Json(body): Json<CreateStationRequest>,
) -> AppResult<(StatusCode, Json<StationResponse>)> {
    let station =
        service::stations::create_station(&*state.db, body.name, body.volume_percentage).await?;

    Ok((StatusCode::CREATED, Json(StationResponse::from(station))))
}

/// Get a specific station by ID or name
#[utoipa::path(
    get,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = String, Path, description = "Station UUID or name"),
    ),
    responses(
        (status = 200, description = "Station retrieved successfully", body = StationResponse),
        (status = 404, description = "Station not found"),
    ),
    tag = "stations"
)]
pub async fn get_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> AppResult<Json<StationResponse>> {
    let station = resolve_station(&*state.db, &station_id).await?;

    Ok(Json(StationResponse::from(station)))
}

/// Update a station
///
/// Partial update; a fill level at or above 80% raises a collection request
/// unless one is already pending. Every update appends to the station's
/// history.
#[utoipa::path(
    patch,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = String, Path, description = "Station UUID or name"),
    ),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = StationResponse),
        (status = 400, description = "Invalid fill level or duplicate name"),
        (status = 404, description = "Station not found"),
    ),
    tag = "stations"
)]
pub async fn update_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(body): Json<UpdateStationRequest>,
) -> AppResult<Json<StationResponse>> {
    let station = resolve_station(&*state.db, &station_id).await?;

    let updated = service::stations::update_station(
        &*state.db,
        station.id,
        StationChanges {
            name: body.name,
            volume_percentage: body.volume_percentage,
        },
    )
    .await?;

    Ok(Json(StationResponse::from(updated)))
}

/// Delete a station
///
/// The station's history is removed with it.
#[utoipa::path(
    delete,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = String, Path, description = "Station UUID or name"),
    ),
    responses(
        (status = 204, description = "Station deleted"),
        (status = 404, description = "Station not found"),
    ),
    tag = "stations"
)]
pub async fn delete_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> AppResult<StatusCode> {
    let station = resolve_station(&*state.db, &station_id).await?;

    service::stations::delete_station(&*state.db, station.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Confirm a pending collection
///
/// Resets the fill level to 0, clears the collection flag, and records a
/// `collection_complete` entry. Rejected with 400 if no collection request
/// is pending.
#[utoipa::path(
    post,
    path = "/api/stations/{station_id}/confirm_collection",
    params(
        ("station_id" = String, Path, description = "Station UUID or name"),
    ),
    responses(
        (status = 200, description = "Collection confirmed", body = ConfirmCollectionResponse),
        (status = 400, description = "No collection request pending"),
        (status = 404, description = "Station not found"),
    ),
    tag = "stations"
)]
pub async fn confirm_collection(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> AppResult<Json<ConfirmCollectionResponse>> {
    let station = resolve_station(&*state.db, &station_id).await?;

    let station = service::stations::confirm_collection(&*state.db, station.id).await?;

    Ok(Json(ConfirmCollectionResponse {
        success: true,
        message: format!("Collection confirmed for station '{}'", station.name),
        station: StationResponse::from(station),
    }))
}
