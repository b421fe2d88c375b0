//! Wire types for the schedule API: request/response DTOs and the
//! error body mapping.

use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use byob_core::ScheduleError;
use byob_schedule::{CreateSchedule, ExecutionReceipt, ScheduleRecord};

// ── Requests ─────────────────────────────────────────────────────

/// Body of `POST /schedules`. Every field is optional at the serde
/// layer so an absent field surfaces as a `MissingField` error kind
/// instead of axum's generic rejection text.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub owner: Option<String>,
    pub token: Option<String>,
    /// Decimal string in the token's display units.
    pub amount: Option<String>,
    pub interval_days: Option<i64>,
    /// Optional first occurrence (ISO-8601). Defaults to one interval
    /// after creation.
    pub start_time: Option<DateTime<Utc>>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ScheduleError> {
    value.ok_or_else(|| ScheduleError::MissingField(field.to_string()))
}

/// Parse a wire amount string into an exact decimal.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, ScheduleError> {
    Decimal::from_str(raw.trim()).map_err(|_| ScheduleError::InvalidAmount(raw.to_string()))
}

impl CreateScheduleRequest {
    pub(crate) fn into_input(self) -> Result<CreateSchedule, ScheduleError> {
        let amount = required(self.amount, "amount")?;
        Ok(CreateSchedule {
            owner: required(self.owner, "owner")?,
            token: required(self.token, "token")?,
            amount: parse_amount(&amount)?,
            interval_days: required(self.interval_days, "intervalDays")?,
            start_time: self.start_time,
        })
    }
}

/// Body of `POST /schedules/{id}/executions`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordExecutionRequest {
    pub tx_hash: Option<String>,
    /// Decimal string of the executed amount.
    pub amount: Option<String>,
}

impl RecordExecutionRequest {
    pub(crate) fn into_parts(self) -> Result<(String, Decimal), ScheduleError> {
        let tx_hash = required(self.tx_hash, "txHash")?;
        let amount = required(self.amount, "amount")?;
        Ok((tx_hash, parse_amount(&amount)?))
    }
}

/// Query parameters for `GET /schedules`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OwnerParams {
    /// Owner address (any case; canonicalized before lookup).
    pub owner: Option<String>,
}

/// Query parameters for `GET /schedules/due`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DueParams {
    /// Evaluate due-selection as of this ISO-8601 instant instead of now.
    pub at: Option<DateTime<Utc>>,
}

// ── Responses ────────────────────────────────────────────────────

/// Wire view of one executed occurrence.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionView {
    pub timestamp: DateTime<Utc>,
    pub tx_hash: String,
    pub amount: String,
}

impl From<ExecutionReceipt> for ExecutionView {
    fn from(receipt: ExecutionReceipt) -> Self {
        Self {
            timestamp: receipt.timestamp,
            tx_hash: receipt.tx_hash,
            amount: receipt.amount.to_string(),
        }
    }
}

/// Wire view of a schedule record. Timestamps serialize as ISO-8601,
/// amounts as decimal strings. The internal idempotency ledger is not
/// exposed.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub owner: String,
    pub token: String,
    pub amount: String,
    pub interval_days: u32,
    pub next_deposit: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub total_deposited: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_execution: Option<ExecutionView>,
}

impl From<ScheduleRecord> for ScheduleResponse {
    fn from(record: ScheduleRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner.to_string(),
            token: record.token.to_string(),
            amount: record.amount.to_string(),
            interval_days: record.interval_days,
            next_deposit: record.next_deposit,
            is_active: record.is_active,
            created_at: record.created_at,
            cancelled_at: record.cancelled_at,
            total_deposited: record.total_deposited.to_string(),
            last_execution: record.last_execution.map(ExecutionView::from),
        }
    }
}

// ── Error mapping ────────────────────────────────────────────────

/// JSON error body: machine-readable kind plus human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Maps [`ScheduleError`] kinds onto HTTP status codes.
pub struct ApiError(pub ScheduleError);

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ScheduleError::MissingField(_)
            | ScheduleError::InvalidAddress(_)
            | ScheduleError::InvalidAmount(_)
            | ScheduleError::InvalidInterval(_) => StatusCode::BAD_REQUEST,
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::DuplicateExecution(_) => StatusCode::CONFLICT,
            ScheduleError::Internal(_) => {
                warn!(error = %self.0, "internal error in schedule API");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
