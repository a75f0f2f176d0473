pub mod health;
pub mod history;
mod rate_limit;
pub mod stations;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::{Condition, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use uuid::Uuid;

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::entity::stations as stations_entity;
use crate::error::{AppError, AppResult};

/// Resolve a station by UUID or name (case-insensitive)
pub async fn resolve_station(
    db: &DatabaseConnection,
    id_or_name: &str,
) -> AppResult<stations_entity::Model> {
    // Try UUID first
    if let Ok(uuid) = id_or_name.parse::<Uuid>() {
        return stations_entity::Entity::find_by_id(uuid)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Station '{id_or_name}' not found")));
    }

    // Fall back to case-insensitive name lookup using LOWER()
    stations_entity::Entity::find()
        .filter(
            Condition::all().add(Expr::cust_with_values("LOWER(name) = LOWER($1)", [id_or_name])),
        )
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Station '{id_or_name}' not found")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        stations::list_stations,
        stations::create_station,
        stations::get_station,
        stations::update_station,
        stations::delete_station,
        stations::confirm_collection,
        history::list_history,
        history::get_history,
    ),
    components(
        schemas(
            stations::StationResponse,
            stations::CreateStationRequest,
            stations::UpdateStationRequest,
            stations::ConfirmCollectionResponse,
            history::HistoryRecordResponse,
            history::HistoryListResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "stations", description = "Waste storage stations and collection requests"),
        (name = "history", description = "Append-only station operation history"),
    ),
    info(
        title = "Fillpoint API",
        description = "Fill-level tracking and collection request API for waste storage stations",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            stations_rate = %format!("{}/s burst {}", config.rate_limit_stations_per_second, config.rate_limit_stations_burst),
            history_rate = %format!("{}/s burst {}", config.rate_limit_history_per_second, config.rate_limit_history_burst),
            "Rate limiting configured"
        );
    }

    // Base routes without rate limiting
    let station_routes_base = Router::new()
        .route(
            "/stations",
            get(stations::list_stations).post(stations::create_station),
        )
        .route(
            "/stations/{station_id}",
            get(stations::get_station)
                .patch(stations::update_station)
                .put(stations::update_station)
                .delete(stations::delete_station),
        )
        .route(
            "/stations/{station_id}/confirm_collection",
            post(stations::confirm_collection),
        );

    let history_routes_base = Router::new()
        .route("/history", get(history::list_history))
        .route("/history/{history_id}", get(history::get_history));

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(station_routes_base)
            .merge(history_routes_base)
    } else {
        let stations_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_stations_per_second)
            .burst_size(config.rate_limit_stations_burst)
            .finish()
            .expect("Failed to create stations rate limiter");

        let history_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_history_per_second)
            .burst_size(config.rate_limit_history_burst)
            .finish()
            .expect("Failed to create history rate limiter");

        Router::new()
            .merge(station_routes_base.layer(GovernorLayer {
                config: Arc::new(stations_limiter),
            }))
            .merge(history_routes_base.layer(GovernorLayer {
                config: Arc::new(history_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
