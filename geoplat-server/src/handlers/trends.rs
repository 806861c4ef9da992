use crate::error::AppResult;
use crate::models::{ErrorResponse, PopularCity, TrendPoint};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/trends/{keyword}",
    params(("keyword" = String, Path, description = "Platform keyword")),
    responses(
        (status = 200, description = "Interest per state, synthetic when the source is unavailable", body = [TrendPoint])
    )
)]
pub async fn get_trends(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> Json<Vec<TrendPoint>> {
    tracing::info!("Fetching popularity for \"{}\"", keyword);
    let region = &state.settings.upstream.trends_region;
    Json(state.trends.fetch_region_interest(&keyword, region).await)
}

#[utoipa::path(
    get,
    path = "/api/most-popular-city/{keyword}/{state_code}",
    params(
        ("keyword" = String, Path, description = "Platform keyword"),
        ("state_code" = String, Path, description = "Two-letter state code")
    ),
    responses(
        (status = 200, description = "City with the highest interest", body = PopularCity),
        (status = 404, description = "Unknown state code", body = ErrorResponse)
    )
)]
pub async fn get_most_popular_city(
    State(state): State<Arc<AppState>>,
    Path((keyword, state_code)): Path<(String, String)>,
) -> AppResult<Json<PopularCity>> {
    let city = state
        .trends
        .fetch_most_popular_city(&keyword, &state_code)
        .await?;
    Ok(Json(city))
}
