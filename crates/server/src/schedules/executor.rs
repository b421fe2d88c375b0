//! Executor-facing endpoints: due-selection polling and execution
//! recording.
//!
//! The external keeper polls `GET /schedules/due`, performs the
//! on-chain transfer itself, then reports success via
//! `POST /schedules/{id}/executions`. Recording is idempotent per
//! `txHash`, so keeper retries are safe.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::state::AppState;

use super::types::{ApiError, DueParams, ErrorBody, RecordExecutionRequest, ScheduleResponse};

/// List active schedules whose next deposit time has elapsed, ordered
/// by ascending `nextDeposit`.
///
/// Read-only: a schedule stays in this list until an execution is
/// recorded against it.
#[utoipa::path(
    get,
    path = "/schedules/due",
    tag = "Executor",
    params(DueParams),
    responses(
        (status = 200, description = "Due schedules", body = Vec<ScheduleResponse>)
    )
)]
pub(crate) async fn list_due(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DueParams>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let now = params.at.unwrap_or_else(Utc::now);
    let records = state.manager.list_due(now)?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Record a successfully executed on-chain deposit: advances
/// `nextDeposit`, accumulates `totalDeposited`, stores the receipt.
#[utoipa::path(
    post,
    path = "/schedules/{id}/executions",
    tag = "Executor",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = RecordExecutionRequest,
    responses(
        (status = 200, description = "Execution recorded", body = ScheduleResponse),
        (status = 404, description = "Schedule not found", body = ErrorBody),
        (status = 409, description = "txHash already recorded", body = ErrorBody)
    )
)]
pub(crate) async fn record_execution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordExecutionRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let (tx_hash, amount) = req.into_parts()?;
    let record = state
        .manager
        .record_execution(id, &tx_hash, amount, Utc::now())?;
    Ok(Json(record.into()))
}
