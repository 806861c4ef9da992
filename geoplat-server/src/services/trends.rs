use crate::data;
use crate::error::{AppError, AppResult};
use crate::models::upstream::InterestRow;
use crate::models::{PopularCity, TrendPoint};
use crate::services::synthetic;
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait]
pub trait InterestSource: Send + Sync {
    async fn region_interest(&self, keyword: &str, region: &str) -> anyhow::Result<Vec<InterestRow>>;
    async fn city_interest(&self, keyword: &str, geo: &str) -> anyhow::Result<Vec<InterestRow>>;
}

pub struct HttpInterestSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInterestSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, endpoint: &str, keyword: &str, geo: &str) -> anyhow::Result<Vec<InterestRow>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let res = self
            .client
            .get(&url)
            .query(&[("keyword", keyword), ("geo", geo)])
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        if !res.status().is_success() {
            anyhow::bail!("GET {} returned {}", url, res.status());
        }

        res.json().await.context("malformed trend response")
    }
}

#[async_trait]
impl InterestSource for HttpInterestSource {
    async fn region_interest(&self, keyword: &str, region: &str) -> anyhow::Result<Vec<InterestRow>> {
        self.fetch("interest-by-region", keyword, region).await
    }

    async fn city_interest(&self, keyword: &str, geo: &str) -> anyhow::Result<Vec<InterestRow>> {
        self.fetch("interest-by-city", keyword, geo).await
    }
}

fn check_rows(rows: &[InterestRow]) -> anyhow::Result<()> {
    if rows.is_empty() {
        anyhow::bail!("empty result");
    }
    if let Some(row) = rows.iter().find(|r| r.value > 100) {
        anyhow::bail!("score {} out of range for {}", row.value, row.geo_code);
    }
    Ok(())
}

pub struct TrendFetcher {
    source: Option<Arc<dyn InterestSource>>,
    demo_mode: bool,
}

impl TrendFetcher {
    pub fn new(source: Option<Arc<dyn InterestSource>>, demo_mode: bool) -> Self {
        Self { source, demo_mode }
    }

    /// Never fails: synthetic scores stand in for a missing or broken source.
    pub async fn fetch_region_interest(&self, keyword: &str, region: &str) -> Vec<TrendPoint> {
        match self.try_region_interest(keyword, region).await {
            Ok(points) => points,
            Err(e) => {
                warn!(keyword, "Trend source unavailable ({:#}), using synthetic interest", e);
                synthetic::region_interest(&mut rand::thread_rng())
            }
        }
    }

    async fn try_region_interest(&self, keyword: &str, region: &str) -> anyhow::Result<Vec<TrendPoint>> {
        let source = self.source.as_ref().context("no trend source configured")?;
        let rows = source.region_interest(keyword, region).await?;
        check_rows(&rows)?;

        let prefix = format!("{}-", region);
        let points = rows
            .into_iter()
            .map(|r| TrendPoint {
                region_code: r
                    .geo_code
                    .strip_prefix(&prefix)
                    .map(str::to_string)
                    .unwrap_or(r.geo_code),
                interest_score: r.value as u8,
            })
            .collect();
        debug!(keyword, region, "Trend source answered");
        Ok(points)
    }

    pub async fn fetch_most_popular_city(&self, keyword: &str, state: &str) -> AppResult<PopularCity> {
        let state = data::canonical_state(state);
        if !data::is_state_code(&state) {
            return Err(AppError::NotFound(format!("Unknown state code: {}", state)));
        }

        match self.try_most_popular_city(keyword, &state).await {
            Ok(city) => Ok(city),
            Err(e) => {
                warn!(keyword, state = %state, "City interest unavailable ({:#}), using fallback", e);
                Ok(self.fallback_city(&state))
            }
        }
    }

    async fn try_most_popular_city(&self, keyword: &str, state: &str) -> anyhow::Result<PopularCity> {
        let source = self.source.as_ref().context("no trend source configured")?;
        let rows = source.city_interest(keyword, &format!("BR-{}", state)).await?;
        check_rows(&rows)?;

        let best = rows
            .into_iter()
            .reduce(|best, r| if r.value > best.value { r } else { best })
            .context("empty result")?;

        Ok(PopularCity {
            name: if best.geo_name.is_empty() {
                best.geo_code
            } else {
                best.geo_name
            },
            interest_score: best.value as u8,
        })
    }

    fn fallback_city(&self, state: &str) -> PopularCity {
        if self.demo_mode {
            if let Some(city) = synthetic::popular_city(&mut rand::thread_rng(), state) {
                return city;
            }
        }
        PopularCity {
            name: data::capital_of(state)
                .unwrap_or(data::DEFAULT_CITY)
                .to_string(),
            interest_score: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Stub {
        Rows(Vec<(&'static str, &'static str, u32)>),
        Fail,
    }

    #[async_trait]
    impl InterestSource for Stub {
        async fn region_interest(&self, _: &str, _: &str) -> anyhow::Result<Vec<InterestRow>> {
            self.rows()
        }

        async fn city_interest(&self, _: &str, _: &str) -> anyhow::Result<Vec<InterestRow>> {
            self.rows()
        }
    }

    impl Stub {
        fn rows(&self) -> anyhow::Result<Vec<InterestRow>> {
            match self {
                Stub::Rows(rows) => Ok(rows
                    .iter()
                    .map(|(code, name, value)| InterestRow {
                        geo_code: code.to_string(),
                        geo_name: name.to_string(),
                        value: *value,
                    })
                    .collect()),
                Stub::Fail => Err(anyhow::anyhow!("connection refused")),
            }
        }
    }

    fn fetcher(stub: Stub, demo_mode: bool) -> TrendFetcher {
        TrendFetcher::new(Some(Arc::new(stub)), demo_mode)
    }

    fn assert_synthetic(points: &[TrendPoint]) {
        assert_eq!(points.len(), 27);
        assert!(points.iter().all(|p| (20..=100).contains(&p.interest_score)));
        assert!(points.iter().any(|p| p.interest_score == 100));
    }

    #[tokio::test]
    async fn test_region_interest_from_source() {
        let f = fetcher(Stub::Rows(vec![("BR-SP", "São Paulo", 100), ("BR-RJ", "Rio", 64)]), false);
        let points = f.fetch_region_interest("netflix", "BR").await;
        assert_eq!(
            points,
            vec![
                TrendPoint { region_code: "SP".to_string(), interest_score: 100 },
                TrendPoint { region_code: "RJ".to_string(), interest_score: 64 },
            ]
        );
    }

    #[tokio::test]
    async fn test_region_interest_falls_back_on_failure() {
        let f = fetcher(Stub::Fail, false);
        assert_synthetic(&f.fetch_region_interest("netflix", "BR").await);
    }

    #[tokio::test]
    async fn test_region_interest_falls_back_on_empty_or_malformed() {
        let f = fetcher(Stub::Rows(vec![]), false);
        assert_synthetic(&f.fetch_region_interest("netflix", "BR").await);

        let f = fetcher(Stub::Rows(vec![("BR-SP", "São Paulo", 250)]), false);
        assert_synthetic(&f.fetch_region_interest("netflix", "BR").await);
    }

    #[tokio::test]
    async fn test_region_interest_without_source() {
        let f = TrendFetcher::new(None, false);
        assert_synthetic(&f.fetch_region_interest("netflix", "BR").await);
    }

    #[tokio::test]
    async fn test_most_popular_city_from_source() {
        let f = fetcher(
            Stub::Rows(vec![("", "Santos", 40), ("", "Campinas", 90), ("", "Osasco", 90)]),
            false,
        );
        let city = f.fetch_most_popular_city("netflix", "sp").await.unwrap();
        assert_eq!(city.name, "Campinas");
        assert_eq!(city.interest_score, 90);
    }

    #[tokio::test]
    async fn test_most_popular_city_capital_fallback() {
        let f = fetcher(Stub::Fail, false);
        let city = f.fetch_most_popular_city("netflix", "BA").await.unwrap();
        assert_eq!(city.name, "Salvador");
        assert_eq!(city.interest_score, 0);
    }

    #[tokio::test]
    async fn test_most_popular_city_demo_fallback() {
        let f = fetcher(Stub::Fail, true);
        let city = f.fetch_most_popular_city("netflix", "BA").await.unwrap();
        assert!(data::example_cities("BA").contains(&city.name.as_str()));
        assert_eq!(city.interest_score, 100);
    }

    #[tokio::test]
    async fn test_most_popular_city_unknown_state() {
        let f = fetcher(Stub::Fail, true);
        assert!(matches!(
            f.fetch_most_popular_city("netflix", "XX").await,
            Err(AppError::NotFound(_))
        ));
    }
}
