mod handlers;
mod types;

pub use handlers::{get_history, list_history};
pub use types::{HistoryListResponse, HistoryQuery, HistoryRecordResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_history, __path_list_history};
