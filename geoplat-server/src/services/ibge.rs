use crate::data;
use crate::error::{AppError, AppResult};
use crate::models::upstream::{IbgeCity, IbgeState};
use crate::models::{CityInfo, StateInfo};
use crate::services::resolver::normalize_key;
use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::error;

/// Proxy for the IBGE "localidades" API.
#[derive(Clone)]
pub struct IbgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl IbgeClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn states(&self) -> AppResult<Vec<StateInfo>> {
        let url = format!("{}/localidades/estados?orderBy=nome", self.base_url);
        let raw: Vec<IbgeState> = self.get_json(&url).await.map_err(|e| {
            error!("IBGE states request failed: {:#}", e);
            AppError::Upstream("Failed to fetch states.".to_string())
        })?;

        let mut states: Vec<StateInfo> = raw
            .into_iter()
            .map(|s| StateInfo {
                id: s.id,
                code: s.sigla,
                name: s.nome,
            })
            .collect();
        states.sort_by_cached_key(|s| (normalize_key(&s.name), s.name.clone()));
        Ok(states)
    }

    pub async fn cities(&self, state_code: &str) -> AppResult<Vec<CityInfo>> {
        let state = data::canonical_state(state_code);
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::BadRequest(format!(
                "Invalid state code: {}",
                state_code
            )));
        }

        let url = format!("{}/localidades/estados/{}/municipios", self.base_url, state);
        let raw: Vec<IbgeCity> = self.get_json(&url).await.map_err(|e| {
            error!("IBGE cities request for {} failed: {:#}", state, e);
            AppError::Upstream(format!("Failed to fetch cities for {}.", state))
        })?;

        Ok(raw
            .into_iter()
            .map(|c| CityInfo {
                id: c.id,
                name: c.nome,
                state_code: state.clone(),
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        if !res.status().is_success() {
            anyhow::bail!("GET {} returned {}", url, res.status());
        }

        res.json::<T>().await.context("malformed IBGE response")
    }
}
