//! HTTP request/response types for flowdeck-web.
//!
//! Query and body shapes of the JSON API plus their OpenAPI schemas. Response
//! bodies reuse the view and model types directly.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{FlowStatus, StatusFilter, ViewMode};
use crate::view::ViewParams;

/// Query string of `GET /api/v1/flows`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFlowsQuery {
    /// Case-insensitive text matched against name and description.
    pub search: Option<String>,
    /// Status filter: all, draft, active, archived.
    pub status: Option<StatusFilter>,
    /// Layout: grid or list.
    pub view: Option<ViewMode>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl From<ListFlowsQuery> for ViewParams {
    fn from(q: ListFlowsQuery) -> Self {
        ViewParams {
            search_query: q.search.unwrap_or_default(),
            status_filter: q.status.unwrap_or_default(),
            view_mode: q.view.unwrap_or_default(),
            page_cursor: q.page.unwrap_or(1).max(1),
        }
    }
}

/// Body of `POST /api/v1/flows`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateFlowRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /api/v1/flows/{id}/toggle-status`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ToggleStatusRequest {
    /// Status the client currently shows for the flow. A toggle is refused
    /// when the store holds a different one.
    pub status: FlowStatus,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
}
