//! Dashboard routes: statistics read and refresh.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::models::statistic::DashboardStat;
use crate::services::dashboard::{self, RefreshOutcome};
use crate::AppState;

/// GET /api/v1/dashboard/stats — current dashboard statistics.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DashboardStat>>>, AppError> {
    let stats = dashboard::get_stats(&state.store).await?;
    Ok(ApiResponse::success(stats))
}

/// POST /api/v1/dashboard/refresh — recompute and persist the tracked
/// statistics. A failed pass still resolves with `success: false` and the
/// triggering error's text; the UI presents it as a notification.
pub async fn refresh(State(state): State<AppState>) -> Json<ApiResponse<RefreshOutcome>> {
    let outcome = dashboard::refresh_stats(&state.store).await;
    ApiResponse::success(outcome)
}
