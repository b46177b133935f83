//! OpenAPI documentation definition.

use flowdeck_core::api::{ApiError, CreateFlowRequest, ToggleStatusRequest};
use flowdeck_core::models::{FlowId, FlowRecord, FlowStatus, StatusFilter, ViewMode};
use flowdeck_core::view::{
    FlowAction, FlowCard, FlowListPresentation, FlowStats, PaginationInfo, StyleClass,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::handle_health,
        crate::handlers::handle_list_flows,
        crate::handlers::handle_create_flow,
        crate::handlers::handle_delete_flow,
        crate::handlers::handle_duplicate_flow,
        crate::handlers::handle_toggle_status,
    ),
    components(schemas(
        FlowListPresentation,
        FlowCard,
        FlowStats,
        PaginationInfo,
        StyleClass,
        FlowAction,
        FlowRecord,
        FlowId,
        FlowStatus,
        StatusFilter,
        ViewMode,
        CreateFlowRequest,
        ToggleStatusRequest,
        ApiError,
    )),
    info(
        title = "flowdeck API",
        version = "1.0",
        description = "Workflows list: filtered, paginated flow cards with create/duplicate/delete/toggle actions"
    )
)]
pub(crate) struct ApiDoc;
