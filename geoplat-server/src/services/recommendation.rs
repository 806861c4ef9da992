use crate::models::{LocationAggregate, Recommendation, RecommendationBasis, TrendPoint};

/// Clicks win when they beat a tenth of the top interest score.
pub fn recommend(
    top_click: Option<&LocationAggregate>,
    top_interest: Option<&TrendPoint>,
) -> Recommendation {
    if let Some(click) = top_click {
        let clicks_win = match top_interest {
            None => true,
            Some(interest) => click.clicks > u64::from(interest.interest_score) / 10,
        };
        if clicks_win {
            return Recommendation {
                basis: RecommendationBasis::Clicks,
                target: Some(click.location.clone()),
                message: format!(
                    "The platform performs best by clicks in {}. Focus campaigns there.",
                    click.location
                ),
            };
        }
    }

    if let Some(interest) = top_interest {
        return Recommendation {
            basis: RecommendationBasis::Interest,
            target: Some(interest.region_code.clone()),
            message: format!(
                "Search interest peaks in {}. Consider brand awareness campaigns there.",
                interest.region_code
            ),
        };
    }

    Recommendation {
        basis: RecommendationBasis::None,
        target: None,
        message: "Not enough data for a recommendation.".to_string(),
    }
}

/// Highest score, earliest entry on ties.
pub fn top_interest(points: &[TrendPoint]) -> Option<&TrendPoint> {
    points
        .iter()
        .reduce(|best, p| if p.interest_score > best.interest_score { p } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(location: &str, clicks: u64) -> LocationAggregate {
        LocationAggregate {
            location: location.to_string(),
            clicks,
        }
    }

    fn point(code: &str, score: u8) -> TrendPoint {
        TrendPoint {
            region_code: code.to_string(),
            interest_score: score,
        }
    }

    #[test]
    fn test_clicks_beat_weak_interest() {
        let rec = recommend(Some(&click("Natal, RN", 11)), Some(&point("SP", 100)));
        assert_eq!(rec.basis, RecommendationBasis::Clicks);
        assert_eq!(rec.target.as_deref(), Some("Natal, RN"));
    }

    #[test]
    fn test_interest_wins_over_few_clicks() {
        let rec = recommend(Some(&click("Natal, RN", 10)), Some(&point("SP", 100)));
        assert_eq!(rec.basis, RecommendationBasis::Interest);
        assert_eq!(rec.target.as_deref(), Some("SP"));
    }

    #[test]
    fn test_clicks_alone() {
        let rec = recommend(Some(&click("Natal, RN", 1)), None);
        assert_eq!(rec.basis, RecommendationBasis::Clicks);
    }

    #[test]
    fn test_no_data() {
        let rec = recommend(None, None);
        assert_eq!(rec.basis, RecommendationBasis::None);
        assert!(rec.target.is_none());
    }

    #[test]
    fn test_top_interest_prefers_first_on_tie() {
        let points = vec![point("AC", 40), point("SP", 100), point("RJ", 100)];
        assert_eq!(top_interest(&points).unwrap().region_code, "SP");
        assert!(top_interest(&[]).is_none());
    }
}
