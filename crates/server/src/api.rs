//! Top-level API handlers and OpenAPI documentation.

use axum::Json;

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub mod doc {
    use utoipa::OpenApi;

    use crate::schedules;

    #[derive(OpenApi)]
    #[openapi(
        paths(
            super::health,
            schedules::create_schedule,
            schedules::get_schedule,
            schedules::list_schedules,
            schedules::cancel_schedule,
            schedules::list_due,
            schedules::record_execution,
        ),
        components(schemas(
            schedules::CreateScheduleRequest,
            schedules::RecordExecutionRequest,
            schedules::ScheduleResponse,
            schedules::ExecutionView,
            schedules::ErrorBody,
        )),
        tags(
            (name = "Schedules", description = "Deposit schedule lifecycle"),
            (name = "Executor", description = "External executor boundary"),
            (name = "System", description = "Health and diagnostics")
        )
    )]
    pub struct ApiDoc;
}
