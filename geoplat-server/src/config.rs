use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub log_format: String,
    pub request_timeout_secs: u64,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub ibge_url: String,
    pub trends_url: String,
    pub trends_region: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Synthetic data is only ever produced for clicks and popular cities
/// when this is enabled.
#[derive(Debug, Deserialize, Clone)]
pub struct DemoSettings {
    pub enabled: bool,
    pub backfill_min: usize,
    pub backfill_max: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeepAliveSettings {
    pub url: String,
    pub interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub demo: DemoSettings,
    pub keepalive: KeepAliveSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("server.port", 5000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.log_level", "info")?
            .set_default("server.log_format", "pretty")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("server.rate_limit_per_second", 6)?
            .set_default("server.rate_limit_burst", 20)?
            .set_default("upstream.ibge_url", "https://servicodados.ibge.gov.br/api/v1")?
            .set_default("upstream.trends_url", "")?
            .set_default("upstream.trends_region", "BR")?
            .set_default("upstream.timeout_secs", 10)?
            .set_default(
                "upstream.user_agent",
                concat!("geoplat-server/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("demo.enabled", false)?
            .set_default("demo.backfill_min", 200_000)?
            .set_default("demo.backfill_max", 250_000)?
            .set_default("keepalive.url", "")?
            .set_default("keepalive.interval_secs", 840)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        validate_settings(&settings, &run_mode)?;
        Ok(settings)
    }
}

fn validate_settings(settings: &Settings, run_mode: &str) -> Result<(), ConfigError> {
    let mut bad = Vec::new();
    if settings.server.request_timeout_secs == 0 {
        bad.push("server.request_timeout_secs");
    }
    if settings.server.rate_limit_per_second == 0 || settings.server.rate_limit_burst == 0 {
        bad.push("server.rate_limit_per_second/burst");
    }
    if settings.upstream.timeout_secs == 0 {
        bad.push("upstream.timeout_secs");
    }
    if settings.demo.backfill_min > settings.demo.backfill_max {
        bad.push("demo.backfill_min");
    }
    if settings.keepalive.interval_secs == 0 {
        bad.push("keepalive.interval_secs");
    }

    if is_production(run_mode) {
        if settings.server.host == "127.0.0.1" || settings.server.host == "localhost" {
            bad.push("server.host");
        }
        if settings.demo.enabled {
            bad.push("demo.enabled");
        }
    }

    if !bad.is_empty() {
        return Err(ConfigError::Message(format!(
            "invalid configuration: {}",
            bad.join(", ")
        )));
    }

    Ok(())
}

fn is_production(run_mode: &str) -> bool {
    matches!(run_mode.to_lowercase().as_str(), "production" | "prod")
}
