use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::predict::{
    predict_passes, warn_if_stale, GroundStation, PassReport, OBSERVER_ELEVATION_M,
};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::config::PredictConfig;
use crate::web::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PredictQuery {
    /// Observer latitude, degrees
    pub lat: f64,
    /// Observer longitude, degrees
    pub lon: f64,
    /// Days to search forward from now
    #[serde(default)]
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub location: Location,
    pub passes: Vec<PassReport>,
}

#[utoipa::path(
    get,
    path = "/api/predict",
    tag = "predict",
    params(PredictQuery),
    responses(
        (status = 200, description = "Visible passes", body = PredictResponse),
        (status = 400, description = "Invalid parameters or prediction failure"),
        (status = 500, description = "Prediction task failed"),
        (status = 503, description = "No TLE loaded")
    )
)]
pub async fn list_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> ApiResult<Json<PredictResponse>> {
    let days = validate(&query, &state.config.predict)?;

    let ephemeris = state.ephemeris().await.ok_or(ApiError::TleUnavailable)?;
    let station = GroundStation::new(query.lat, query.lon, OBSERVER_ELEVATION_M);
    let start = Utc::now();
    warn_if_stale(&ephemeris, start);

    let passes = tokio::task::spawn_blocking(move || {
        predict_passes(ephemeris.as_ref(), station, start, days)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(PredictResponse {
        location: Location {
            lat: query.lat,
            lon: query.lon,
        },
        passes,
    }))
}

/// Checks the query and resolves the number of days to search.
fn validate(query: &PredictQuery, config: &PredictConfig) -> ApiResult<i64> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lon) {
        return Err(ApiError::Validation("coordinates out of range".into()));
    }
    let days = query.days.unwrap_or(config.days);
    if days < 0 {
        return Err(ApiError::Validation("days must not be negative".into()));
    }
    if days > config.max_days {
        return Err(ApiError::Validation(format!(
            "days must not exceed {}",
            config.max_days
        )));
    }
    Ok(days)
}
