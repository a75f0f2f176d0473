use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::stations;

#[derive(Debug, Serialize, ToSchema)]
pub struct StationResponse {
    pub id: Uuid,
    pub name: String,
    pub volume_percentage: f64,
    pub collection_requested: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<stations::Model> for StationResponse {
    fn from(station: stations::Model) -> Self {
        Self {
            id: station.id,
            name: station.name,
            volume_percentage: station.volume_percentage,
            collection_requested: station.collection_requested,
            created_at: station.created_at,
            updated_at: station.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStationRequest {
    pub name: String,
    /// Initial fill level, defaults to 0
    #[serde(default)]
    pub volume_percentage: f64,
}

/// Partial update; omitted fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStationRequest {
    pub name: Option<String>,
    pub volume_percentage: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmCollectionResponse {
    pub success: bool,
    pub message: String,
    pub station: StationResponse,
}
