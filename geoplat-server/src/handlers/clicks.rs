use crate::error::{AppError, AppResult};
use crate::models::{ClickAnalysis, ClickRequest, ClickResponse, ErrorResponse, Recommendation};
use crate::services::recommendation::{recommend, top_interest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/clicks",
    request_body = ClickRequest,
    responses(
        (status = 201, description = "Click recorded", body = ClickResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse)
    )
)]
pub async fn record_click(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClickRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ClickResponse>)> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    payload
        .validate()
        .map_err(|e: validator::ValidationErrors| AppError::BadRequest(e.to_string()))?;

    let event = state
        .clicks
        .record_click(&payload.platform, &payload.city, &payload.state)?;

    Ok((
        StatusCode::CREATED,
        Json(ClickResponse {
            message: format!(
                "Click on {} recorded for {}",
                event.platform,
                event.location()
            ),
        }),
    ))
}

async fn analyze(state: &AppState, platform: String) -> AppResult<ClickAnalysis> {
    let tracker = state.clicks.clone();
    tokio::task::spawn_blocking(move || tracker.analyze(&platform))
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

#[utoipa::path(
    get,
    path = "/api/click-analysis/{platform}",
    params(("platform" = String, Path, description = "Platform keyword or hostname")),
    responses(
        (status = 200, description = "Clicks grouped by location", body = ClickAnalysis)
    )
)]
pub async fn get_click_analysis(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
) -> AppResult<Json<ClickAnalysis>> {
    Ok(Json(analyze(&state, platform).await?))
}

#[utoipa::path(
    get,
    path = "/api/recommendation/{platform}",
    params(("platform" = String, Path, description = "Platform keyword or hostname")),
    responses(
        (status = 200, description = "Where to focus campaigns", body = Recommendation)
    )
)]
pub async fn get_recommendation(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
) -> AppResult<Json<Recommendation>> {
    let region = &state.settings.upstream.trends_region;
    let interest = state.trends.fetch_region_interest(&platform, region).await;
    let analysis = analyze(&state, platform).await?;

    Ok(Json(recommend(
        analysis.breakdown.first(),
        top_interest(&interest),
    )))
}
