use std::time::Duration;
use tokio::task::JoinHandle;

/// Periodically pings `url` so hosted instances are not put to sleep.
pub fn spawn(client: reqwest::Client, url: String, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match client.get(&url).send().await {
                Ok(res) => tracing::debug!(status = %res.status(), "keep-alive ping to {}", url),
                Err(e) => tracing::warn!("keep-alive ping to {} failed: {}", url, e),
            }
        }
    })
}
