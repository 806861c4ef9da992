use chrono::{DateTime, Utc};

pub use geoplat_common::{
    CityInfo, ClickAnalysis, ClickRequest, ClickResponse, ErrorResponse, LocationAggregate,
    PopularCity, Recommendation, RecommendationBasis, StateInfo, TrendPoint, VpnServer,
    VpnSuggestion,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub platform: String,
    pub city: String,
    pub state: String,
    pub timestamp: DateTime<Utc>,
}

impl ClickEvent {
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

/// Shapes returned by the upstream services, before reshaping.
pub mod upstream {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct IbgeState {
        pub id: u32,
        pub sigla: String,
        pub nome: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct IbgeCity {
        pub id: u32,
        pub nome: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InterestRow {
        pub geo_code: String,
        #[serde(default)]
        pub geo_name: String,
        pub value: u32,
    }
}
