//! Migration trigger endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::policy::{MigrationReport, OralHistoryPolicy};
use crate::AppState;

/// Successful migration response
#[derive(Debug, Serialize)]
pub struct MigrateResponse {
    pub message: String,
    pub report: MigrationReport,
}

/// POST /migrate/OralHistory/:pid
///
/// 201 with a confirmation message when every step succeeded, 400 with
/// `Failed to migrate {pid}` otherwise. The cause is logged and kept as the
/// service's last error.
pub async fn migrate_oral_history(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> ApiResult<(StatusCode, Json<MigrateResponse>)> {
    let pid = pid.trim().to_string();

    let outcome = if is_pid(&pid) {
        state.migrator.run(&OralHistoryPolicy, &pid).await.map_err(|e| e.to_string())
    } else {
        Err("not a pid".to_string())
    };

    match outcome {
        Ok(report) => {
            state.outcomes.record_success();
            Ok((
                StatusCode::CREATED,
                Json(MigrateResponse {
                    message: format!("Oral History {pid} Successfully Migrated"),
                    report,
                }),
            ))
        }
        Err(cause) => {
            tracing::error!(pid = %pid, error = %cause, "Oral history migration failed");
            state.outcomes.record_failure();
            *state.last_error.write().await = Some(format!("{pid}: {cause}"));
            Err(ApiError::MigrationFailed(pid))
        }
    }
}

/// `namespace:id` with both halves non-empty
fn is_pid(pid: &str) -> bool {
    matches!(pid.split_once(':'), Some((ns, id)) if !ns.is_empty() && !id.is_empty())
}

/// Build migration routes
pub fn migrate_routes() -> Router<AppState> {
    Router::new().route("/migrate/OralHistory/:pid", post(migrate_oral_history))
}
