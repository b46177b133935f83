//! HTTP request handlers for the workflows list API.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;

use flowdeck_core::api::{ApiError, CreateFlowRequest, ListFlowsQuery, ToggleStatusRequest};
use flowdeck_core::error::FlowError;
use flowdeck_core::gateway::GatewayError;
use flowdeck_core::models::{FlowId, FlowRecord};
use flowdeck_core::view::{FlowListPresentation, ViewParams};

use crate::state::AppState;

// ============================================================
// Errors
// ============================================================

/// Failure rendered as an HTTP response with an [`ApiError`] body.
pub(crate) enum ApiFailure {
    /// Refused by the view model or the record store.
    Flow(FlowError),
    /// Request could not be decoded (bad JSON body or query string).
    Malformed { status: StatusCode, message: String },
}

impl From<FlowError> for ApiFailure {
    fn from(e: FlowError) -> Self {
        Self::Flow(e)
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiFailure {
    fn status(&self) -> StatusCode {
        match self {
            Self::Flow(FlowError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Flow(FlowError::UnsupportedTransition { .. })
            | Self::Flow(FlowError::StaleStatus { .. }) => StatusCode::CONFLICT,
            Self::Flow(FlowError::Gateway(GatewayError::NotFound(_))) => StatusCode::NOT_FOUND,
            Self::Flow(FlowError::Gateway(GatewayError::Rejected(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Flow(FlowError::Gateway(GatewayError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Malformed { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::Flow(e) => e.to_string(),
            Self::Malformed { message, .. } => message,
        };
        (status, Json(ApiError { error })).into_response()
    }
}

// ============================================================
// Health
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// List
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/flows",
    params(ListFlowsQuery),
    responses(
        (status = 200, description = "Filtered page of flows with stats", body = FlowListPresentation),
        (status = 400, description = "Malformed query string", body = ApiError),
        (status = 503, description = "Record store unavailable", body = ApiError)
    )
)]
pub(crate) async fn handle_list_flows(
    State(app): AppState,
    query: Result<Query<ListFlowsQuery>, QueryRejection>,
) -> Result<Json<FlowListPresentation>, ApiFailure> {
    let Query(query) = query?;
    let mut vm = app.view_model(query.into());
    vm.refresh().await?;
    Ok(Json(vm.presentation(Utc::now())))
}

// ============================================================
// Mutations
// ============================================================

#[utoipa::path(
    post,
    path = "/api/v1/flows",
    request_body = CreateFlowRequest,
    responses(
        (status = 201, description = "Flow created", body = FlowRecord),
        (status = 400, description = "Malformed body", body = ApiError),
        (status = 422, description = "Empty name", body = ApiError)
    )
)]
pub(crate) async fn handle_create_flow(
    State(app): AppState,
    req: Result<Json<CreateFlowRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FlowRecord>), ApiFailure> {
    let Json(req) = req?;
    let mut vm = app.view_model(ViewParams::default());
    let record = vm.request_create(&req.name, &req.description).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/flows/{id}",
    params(("id" = String, Path, description = "Flow id")),
    responses(
        (status = 204, description = "Flow deleted"),
        (status = 404, description = "Unknown flow", body = ApiError)
    )
)]
pub(crate) async fn handle_delete_flow(
    State(app): AppState,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    app.view_model(ViewParams::default())
        .request_delete(&FlowId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/flows/{id}/duplicate",
    params(("id" = String, Path, description = "Flow id")),
    responses(
        (status = 201, description = "Copy created", body = FlowRecord),
        (status = 404, description = "Unknown flow", body = ApiError)
    )
)]
pub(crate) async fn handle_duplicate_flow(
    State(app): AppState,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<FlowRecord>), ApiFailure> {
    let copy = app
        .view_model(ViewParams::default())
        .request_duplicate(&FlowId(id))
        .await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

#[utoipa::path(
    post,
    path = "/api/v1/flows/{id}/toggle-status",
    params(("id" = String, Path, description = "Flow id")),
    request_body = ToggleStatusRequest,
    responses(
        (status = 200, description = "Status flipped between draft and active", body = FlowRecord),
        (status = 400, description = "Malformed body", body = ApiError),
        (status = 404, description = "Unknown flow", body = ApiError),
        (status = 409, description = "Stored status is archived or differs from the one sent", body = ApiError)
    )
)]
pub(crate) async fn handle_toggle_status(
    State(app): AppState,
    Path(id): Path<String>,
    req: Result<Json<ToggleStatusRequest>, JsonRejection>,
) -> Result<Json<FlowRecord>, ApiFailure> {
    let Json(req) = req?;
    let updated = app
        .view_model(ViewParams::default())
        .request_toggle_stored(&FlowId(id), req.status)
        .await?;
    Ok(Json(updated))
}
