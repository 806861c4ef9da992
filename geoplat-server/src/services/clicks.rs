use crate::config::DemoSettings;
use crate::data;
use crate::models::{ClickAnalysis, ClickEvent, LocationAggregate};
use crate::services::synthetic;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClickError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),
}

/// Append-only event storage.
pub trait ClickStore: Send + Sync {
    fn append(&self, events: Vec<ClickEvent>);
    fn query_by_platform(&self, platform: &str) -> Vec<ClickEvent>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemoryClickStore {
    events: RwLock<Vec<ClickEvent>>,
}

impl InMemoryClickStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClickStore for InMemoryClickStore {
    fn append(&self, mut events: Vec<ClickEvent>) {
        self.events.write().append(&mut events);
    }

    fn query_by_platform(&self, platform: &str) -> Vec<ClickEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.platform == platform)
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.events.read().len()
    }
}

/// Reduces a keyword, hostname or URL to the key clicks are stored under.
pub fn normalize_platform(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let host = if lowered.contains("://") {
        url::Url::parse(&lowered).ok()
    } else if lowered.contains('.') && !lowered.contains(char::is_whitespace) {
        url::Url::parse(&format!("http://{}", lowered)).ok()
    } else {
        None
    }
    .and_then(|u| u.host_str().map(str::to_string));

    let key = host.unwrap_or(lowered);
    match key.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => key,
    }
}

/// Groups by "city, state" and sorts by count, ties kept in first-seen order.
pub fn aggregate_events(events: &[ClickEvent]) -> ClickAnalysis {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut breakdown: Vec<LocationAggregate> = Vec::new();

    for event in events {
        let location = event.location();
        match index.get(&location) {
            Some(&idx) => breakdown[idx].clicks += 1,
            None => {
                index.insert(location.clone(), breakdown.len());
                breakdown.push(LocationAggregate {
                    location,
                    clicks: 1,
                });
            }
        }
    }

    // sort_by is stable
    breakdown.sort_by(|a, b| b.clicks.cmp(&a.clicks));

    ClickAnalysis {
        total: events.len() as u64,
        breakdown,
    }
}

struct BackfillRange {
    min: usize,
    max: usize,
}

pub struct ClickTracker {
    store: Arc<dyn ClickStore>,
    backfill: Option<BackfillRange>,
    backfill_lock: Mutex<()>,
}

impl ClickTracker {
    pub fn new(store: Arc<dyn ClickStore>, demo: &DemoSettings) -> Self {
        let backfill = demo.enabled.then(|| BackfillRange {
            min: demo.backfill_min,
            max: demo.backfill_max.max(demo.backfill_min),
        });

        Self {
            store,
            backfill,
            backfill_lock: Mutex::new(()),
        }
    }

    pub fn in_memory(demo: &DemoSettings) -> Self {
        Self::new(Arc::new(InMemoryClickStore::new()), demo)
    }

    pub fn store(&self) -> &Arc<dyn ClickStore> {
        &self.store
    }

    pub fn record_click(
        &self,
        platform: &str,
        city: &str,
        state: &str,
    ) -> Result<ClickEvent, ClickError> {
        let platform = normalize_platform(platform);
        if platform.is_empty() {
            return Err(ClickError::MissingField("platform"));
        }
        let city = city.trim();
        if city.is_empty() {
            return Err(ClickError::MissingField("city"));
        }
        let state = data::canonical_state(state);
        if state.is_empty() {
            return Err(ClickError::MissingField("state"));
        }

        let event = ClickEvent {
            platform,
            city: city.to_string(),
            state,
            timestamp: Utc::now(),
        };
        debug!(platform = %event.platform, location = %event.location(), "click recorded");
        self.store.append(vec![event.clone()]);
        Ok(event)
    }

    /// Aggregation over recorded clicks only.
    pub fn aggregate(&self, platform: &str) -> ClickAnalysis {
        self.aggregate_key(&normalize_platform(platform))
    }

    /// Like [`aggregate`](Self::aggregate), but in demo mode an empty
    /// platform is first filled with a synthetic batch.
    pub fn analyze(&self, platform: &str) -> ClickAnalysis {
        let key = normalize_platform(platform);
        let analysis = self.aggregate_key(&key);
        if analysis.total > 0 {
            return analysis;
        }
        let Some(range) = &self.backfill else {
            return analysis;
        };

        let _guard = self.backfill_lock.lock();
        let analysis = self.aggregate_key(&key);
        if analysis.total > 0 {
            return analysis;
        }

        let mut rng = rand::thread_rng();
        let count = rng.gen_range(range.min..=range.max);
        info!(
            platform = %key,
            count,
            "No clicks recorded, backfilling synthetic demo data"
        );
        let batch = synthetic::click_batch(&mut rng, &key, count);
        self.store.append(batch);

        self.aggregate_key(&key)
    }

    fn aggregate_key(&self, key: &str) -> ClickAnalysis {
        aggregate_events(&self.store.query_by_platform(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(enabled: bool) -> DemoSettings {
        DemoSettings {
            enabled,
            backfill_min: 50,
            backfill_max: 80,
        }
    }

    fn event(platform: &str, city: &str, state: &str) -> ClickEvent {
        ClickEvent {
            platform: platform.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_platform() {
        assert_eq!(normalize_platform("  Netflix "), "netflix");
        assert_eq!(normalize_platform("https://www.Netflix.com/browse"), "netflix.com");
        assert_eq!(normalize_platform("www.netflix.com"), "netflix.com");
        assert_eq!(normalize_platform("netflix.com/title/1"), "netflix.com");
        assert_eq!(normalize_platform("prime video"), "prime video");
        assert_eq!(normalize_platform("   "), "");
    }

    #[test]
    fn test_record_click_requires_every_field() {
        let tracker = ClickTracker::in_memory(&demo(false));
        assert_eq!(
            tracker.record_click("", "Campinas", "SP"),
            Err(ClickError::MissingField("platform"))
        );
        assert_eq!(
            tracker.record_click("netflix", "  ", "SP"),
            Err(ClickError::MissingField("city"))
        );
        assert_eq!(
            tracker.record_click("netflix", "Campinas", ""),
            Err(ClickError::MissingField("state"))
        );
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_record_click_normalizes() {
        let tracker = ClickTracker::in_memory(&demo(false));
        let event = tracker
            .record_click("https://www.netflix.com", " Campinas ", "sp")
            .unwrap();
        assert_eq!(event.platform, "netflix.com");
        assert_eq!(event.location(), "Campinas, SP");
        assert_eq!(tracker.store().len(), 1);
    }

    #[test]
    fn test_aggregate_empty_platform() {
        let tracker = ClickTracker::in_memory(&demo(true));
        assert_eq!(tracker.aggregate("netflix"), ClickAnalysis::default());
    }

    #[test]
    fn test_platforms_are_isolated() {
        let tracker = ClickTracker::in_memory(&demo(false));
        tracker.record_click("netflix", "Campinas", "SP").unwrap();
        tracker.record_click("spotify", "Recife", "PE").unwrap();
        tracker.record_click("spotify", "Recife", "PE").unwrap();

        let analysis = tracker.analyze("netflix");
        assert_eq!(analysis.total, 1);
        assert_eq!(analysis.breakdown.len(), 1);
        assert_eq!(analysis.breakdown[0].location, "Campinas, SP");
    }

    #[test]
    fn test_breakdown_sorted_with_stable_ties() {
        let events = vec![
            event("p", "Santos", "SP"),
            event("p", "Recife", "PE"),
            event("p", "Natal", "RN"),
            event("p", "Natal", "RN"),
            event("p", "Recife", "PE"),
            event("p", "Natal", "RN"),
            event("p", "Palmas", "TO"),
        ];
        let analysis = aggregate_events(&events);
        assert_eq!(analysis.total, 7);
        let labels: Vec<(&str, u64)> = analysis
            .breakdown
            .iter()
            .map(|a| (a.location.as_str(), a.clicks))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Natal, RN", 3),
                ("Recife, PE", 2),
                ("Santos, SP", 1),
                ("Palmas, TO", 1),
            ]
        );
    }

    #[test]
    fn test_analyze_without_demo_mode_stays_empty() {
        let tracker = ClickTracker::in_memory(&demo(false));
        assert_eq!(tracker.analyze("netflix").total, 0);
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_analyze_backfills_once_in_demo_mode() {
        let tracker = ClickTracker::in_memory(&demo(true));
        let first = tracker.analyze("netflix");
        assert!((50..=80).contains(&first.total));
        assert!(!first.breakdown.is_empty());

        let second = tracker.analyze("netflix");
        assert_eq!(first.total, second.total);
        assert_eq!(tracker.store().len() as u64, first.total);
    }

    #[test]
    fn test_concurrent_analyze_backfills_once() {
        let tracker = ClickTracker::in_memory(&demo(true));
        let totals: Vec<u64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| tracker.analyze("p").total))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let total = totals[0];
        assert!((50..=80).contains(&total));
        assert!(totals.iter().all(|t| *t == total));
        assert_eq!(tracker.store().len() as u64, total);
    }

    #[test]
    fn test_analyze_does_not_backfill_recorded_platform() {
        let tracker = ClickTracker::in_memory(&demo(true));
        tracker.record_click("netflix", "Campinas", "SP").unwrap();
        let analysis = tracker.analyze("Netflix");
        assert_eq!(analysis.total, 1);
    }
}
