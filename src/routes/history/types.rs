use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::{station_history, stations};

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryRecordResponse {
    pub id: Uuid,
    pub station_id: Uuid,
    /// Owning station's name, denormalized for display
    pub station_name: String,
    pub operation_type: String,
    pub volume_percentage: f64,
    pub timestamp: DateTime<FixedOffset>,
    pub notes: Option<String>,
}

impl From<(station_history::Model, Option<stations::Model>)> for HistoryRecordResponse {
    fn from((record, station): (station_history::Model, Option<stations::Model>)) -> Self {
        Self {
            id: record.id,
            station_id: record.station_id,
            station_name: station.map(|s| s.name).unwrap_or_default(),
            operation_type: record.operation_type,
            volume_percentage: record.volume_percentage,
            timestamp: record.timestamp,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryListResponse {
    /// Total number of matching records across all pages
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<HistoryRecordResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Filter by station ID
    pub station_id: Option<Uuid>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Records per page (capped server-side)
    pub page_size: Option<u64>,
}
