use axum::{extract::State, Json};
use chrono::Utc;

use crate::tracker::{current_position, TrackPosition};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/track",
    tag = "track",
    responses(
        (status = 200, description = "Current sub-satellite point", body = TrackPosition),
        (status = 503, description = "No TLE loaded")
    )
)]
pub async fn current(State(state): State<AppState>) -> ApiResult<Json<TrackPosition>> {
    let ephemeris = state.ephemeris().await.ok_or(ApiError::TleUnavailable)?;
    Ok(Json(current_position(&ephemeris, Utc::now())?))
}
