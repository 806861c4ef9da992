//! Random stand-ins for upstream data.

use crate::data;
use crate::models::ClickEvent;
use chrono::{Duration, Utc};
use geoplat_common::{PopularCity, TrendPoint};
use rand::seq::SliceRandom;
use rand::Rng;

const BACKFILL_WINDOW_SECS: i64 = 30 * 24 * 3600;

/// One point per state, scores in [20, 100), with one random state forced to 100.
pub fn region_interest<R: Rng + ?Sized>(rng: &mut R) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = data::STATE_CODES
        .iter()
        .map(|code| TrendPoint {
            region_code: code.to_string(),
            interest_score: rng.gen_range(20..100),
        })
        .collect();

    let top = rng.gen_range(0..points.len());
    points[top].interest_score = 100;
    points
}

pub fn popular_city<R: Rng + ?Sized>(rng: &mut R, state: &str) -> Option<PopularCity> {
    data::example_cities(state)
        .choose(rng)
        .map(|name| PopularCity {
            name: name.to_string(),
            interest_score: 100,
        })
}

/// `count` clicks for `platform` spread over random example cities and the last 30 days.
pub fn click_batch<R: Rng + ?Sized>(rng: &mut R, platform: &str, count: usize) -> Vec<ClickEvent> {
    let now = Utc::now();
    (0..count)
        .map(|_| {
            let (state, cities) = data::EXAMPLE_CITIES[rng.gen_range(0..data::EXAMPLE_CITIES.len())];
            let city = cities[rng.gen_range(0..cities.len())];
            ClickEvent {
                platform: platform.to_string(),
                city: city.to_string(),
                state: state.to_string(),
                timestamp: now - Duration::seconds(rng.gen_range(0..BACKFILL_WINDOW_SECS)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_region_interest_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let points = region_interest(&mut rng);
            assert_eq!(points.len(), 27);
            assert!(points
                .iter()
                .all(|p| (20..=100).contains(&p.interest_score)));
            assert!(points.iter().any(|p| p.interest_score == 100));
            let codes: Vec<&str> = points.iter().map(|p| p.region_code.as_str()).collect();
            assert_eq!(codes, data::STATE_CODES.to_vec());
        }
    }

    #[test]
    fn test_popular_city_comes_from_state_examples() {
        let mut rng = StdRng::seed_from_u64(1);
        let city = popular_city(&mut rng, "rs").unwrap();
        assert!(data::example_cities("RS").contains(&city.name.as_str()));
        assert_eq!(city.interest_score, 100);
        assert!(popular_city(&mut rng, "XX").is_none());
    }

    #[test]
    fn test_click_batch() {
        let mut rng = StdRng::seed_from_u64(3);
        let batch = click_batch(&mut rng, "netflix.com", 500);
        assert_eq!(batch.len(), 500);
        let cutoff = Utc::now() - Duration::seconds(BACKFILL_WINDOW_SECS + 5);
        for event in &batch {
            assert_eq!(event.platform, "netflix.com");
            assert!(data::example_cities(&event.state).contains(&event.city.as_str()));
            assert!(event.timestamp > cutoff);
        }
    }
}
