pub mod clicks;
pub mod ibge;
pub mod keepalive;
pub mod recommendation;
pub mod resolver;
pub mod synthetic;
pub mod trends;

use crate::config::UpstreamSettings;
use std::time::Duration;

pub fn http_client(settings: &UpstreamSettings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
}
