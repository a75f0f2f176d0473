use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One operation recorded against a station. Rows are append-only and are
/// removed only by the FK cascade when the owning station is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "station_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub station_id: Uuid,
    pub operation_type: String,
    pub volume_percentage: f64,
    pub timestamp: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stations::Entity",
        from = "Column::StationId",
        to = "super::stations::Column::Id"
    )]
    Station,
}

impl Related<super::stations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Closed set of operation kinds stored in `operation_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Create,
    Update,
    CollectionRequest,
    CollectionComplete,
}

impl OperationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::CollectionRequest => "collection_request",
            Self::CollectionComplete => "collection_complete",
        }
    }
}
