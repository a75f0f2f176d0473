mod handlers;
mod types;

pub use handlers::{
    confirm_collection, create_station, delete_station, get_station, list_stations, update_station,
};
pub use types::{
    ConfirmCollectionResponse, CreateStationRequest, StationResponse, UpdateStationRequest,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_confirm_collection, __path_create_station, __path_delete_station, __path_get_station,
    __path_list_stations, __path_update_station,
};
