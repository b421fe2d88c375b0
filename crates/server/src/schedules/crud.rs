//! CRUD endpoints for deposit schedules: create, get, list by owner,
//! cancel.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use byob_core::ScheduleError;

use crate::state::AppState;

use super::types::{ApiError, CreateScheduleRequest, ErrorBody, OwnerParams, ScheduleResponse};

/// Create a new deposit schedule.
///
/// Returns 201 on success, 400 with a machine-readable error kind
/// (`MissingField`, `InvalidAddress`, `InvalidAmount`, `InvalidInterval`)
/// on validation failure.
#[utoipa::path(
    post,
    path = "/schedules",
    tag = "Schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Validation failure", body = ErrorBody)
    )
)]
pub(crate) async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let input = req.into_input()?;
    let record = state.manager.create(input, Utc::now())?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Get a single schedule by ID.
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    tag = "Schedules",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule details", body = ScheduleResponse),
        (status = 404, description = "Schedule not found", body = ErrorBody)
    )
)]
pub(crate) async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let record = state.manager.get(id)?;
    Ok(Json(record.into()))
}

/// List schedules for one owner (cancelled records included, for
/// history).
#[utoipa::path(
    get,
    path = "/schedules",
    tag = "Schedules",
    params(OwnerParams),
    responses(
        (status = 200, description = "Schedules for the owner", body = Vec<ScheduleResponse>),
        (status = 400, description = "Missing or invalid owner", body = ErrorBody)
    )
)]
pub(crate) async fn list_schedules(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerParams>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let owner = params
        .owner
        .ok_or_else(|| ScheduleError::MissingField("owner".to_string()))?;
    let records = state.manager.list_by_owner(&owner)?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Cancel a schedule. The record is retained; cancelling twice is a
/// no-op success.
#[utoipa::path(
    post,
    path = "/schedules/{id}/cancel",
    tag = "Schedules",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule cancelled", body = ScheduleResponse),
        (status = 404, description = "Schedule not found", body = ErrorBody)
    )
)]
pub(crate) async fn cancel_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let record = state.manager.cancel(id, Utc::now())?;
    Ok(Json(record.into()))
}
