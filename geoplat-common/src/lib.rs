use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[cfg(feature = "validation")]
use validator::Validate;

/// A Brazilian federative unit as exposed by `/states`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StateInfo {
    pub id: u32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CityInfo {
    pub id: u32,
    pub name: String,
    pub state_code: String,
}

/// Entry of the VPN server directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VpnServer {
    pub city: String,
    pub state: String,
    pub ip: String,
    pub provider: String,
}

impl VpnServer {
    /// "city, state" label used by suggestions and click aggregates.
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VpnSuggestion {
    pub ip: String,
    pub location: String,
    pub provider: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub region_code: String,
    pub interest_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PopularCity {
    pub name: String,
    pub interest_score: u8,
}

/// Body of `POST /clicks`. Missing fields deserialize as empty strings so
/// they are reported as validation errors instead of decode failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct ClickRequest {
    #[serde(default)]
    #[cfg_attr(feature = "validation", validate(length(min = 1, max = 200)))]
    pub platform: String,
    #[serde(default)]
    #[cfg_attr(feature = "validation", validate(length(min = 1, max = 100)))]
    pub city: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(custom(function = "validate_state_code"))
    )]
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ClickResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LocationAggregate {
    pub location: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ClickAnalysis {
    pub total: u64,
    pub breakdown: Vec<LocationAggregate>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RecommendationBasis {
    Clicks,
    Interest,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Recommendation {
    pub basis: RecommendationBasis,
    pub target: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorResponse {
    pub error: String,
    pub success: bool,
}


#[cfg(feature = "validation")]
fn validate_state_code(value: &str) -> Result<(), validator::ValidationError> {
    let trimmed = value.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(validator::ValidationError::new("state_code"));
    }
    Ok(())
}
