use crate::error::AppResult;
use crate::models::{CityInfo, ErrorResponse, StateInfo, VpnServer, VpnSuggestion};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/states",
    responses(
        (status = 200, description = "States sorted by name", body = [StateInfo]),
        (status = 500, description = "Geographic source unavailable", body = ErrorResponse)
    )
)]
pub async fn get_states(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<StateInfo>>> {
    Ok(Json(state.ibge.states().await?))
}

#[utoipa::path(
    get,
    path = "/api/cities/{state_code}",
    params(("state_code" = String, Path, description = "Two-letter state code")),
    responses(
        (status = 200, description = "Cities of the state", body = [CityInfo]),
        (status = 400, description = "Malformed state code", body = ErrorResponse),
        (status = 500, description = "Geographic source unavailable", body = ErrorResponse)
    )
)]
pub async fn get_cities(
    State(state): State<Arc<AppState>>,
    Path(state_code): Path<String>,
) -> AppResult<Json<Vec<CityInfo>>> {
    Ok(Json(state.ibge.cities(&state_code).await?))
}

#[utoipa::path(
    get,
    path = "/api/vpn-ip/{state_code}/{city_name}",
    params(
        ("state_code" = String, Path, description = "Two-letter state code"),
        ("city_name" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "Suggested server, with the fallback used", body = VpnSuggestion)
    )
)]
pub async fn get_vpn_ip(
    State(state): State<Arc<AppState>>,
    Path((state_code, city_name)): Path<(String, String)>,
) -> Json<VpnSuggestion> {
    let resolution = state.resolver.resolve(&state_code, &city_name);
    tracing::debug!(
        state = %state_code,
        city = %city_name,
        tier = ?resolution.tier,
        "resolved VPN server"
    );
    Json(resolution.into_suggestion())
}

#[utoipa::path(
    get,
    path = "/api/vpn-servers",
    responses(
        (status = 200, description = "VPN server directory", body = [VpnServer])
    )
)]
pub async fn get_vpn_servers(State(state): State<Arc<AppState>>) -> Json<Vec<VpnServer>> {
    Json(state.resolver.servers().to_vec())
}
