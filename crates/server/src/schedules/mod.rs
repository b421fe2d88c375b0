//! Deposit schedule API endpoints.
//!
//! One interface for both consumers of the manager: the web client
//! (create, cancel, owner-scoped list) and the external executor
//! (due polling, execution recording).

mod crud;
mod executor;
mod types;


use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub use self::crud::*;
pub use self::executor::*;
pub use self::types::*;

/// Build the schedules sub-router.
///
/// Mount this on the main router with `.merge(schedules_router())`.
/// `/schedules/due` MUST precede `/schedules/{id}` so "due" is not
/// captured as an id.
pub fn schedules_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/schedules/due", get(list_due))
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/{id}", get(get_schedule))
        .route("/schedules/{id}/cancel", post(cancel_schedule))
        .route("/schedules/{id}/executions", post(record_execution))
}
