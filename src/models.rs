use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// National Weather Service API Models
// ============================================================================

/// Active alerts for an area, as returned by `/alerts/active/area/{state}`.
///
/// A response without a `features` field is distinguished from one with an
/// empty array; the handler reports them differently.
#[derive(Debug, Deserialize)]
pub struct AlertCollection {
    pub features: Option<Vec<AlertFeature>>,
}

/// One alert record from the feature collection. Every field is optional;
/// the formatter substitutes placeholders rather than failing.
#[derive(Debug, Deserialize)]
pub struct AlertFeature {
    pub properties: Option<AlertProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertProperties {
    pub event: Option<String>,
    #[serde(rename = "areaDesc")]
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
}

/// Grid point lookup result from `/points/{lat},{lon}`. The forecast URL is
/// required; a points document without it is upstream schema drift and fails
/// deserialization.
#[derive(Debug, Deserialize)]
pub struct ForecastPoint {
    pub properties: PointProperties,
}

#[derive(Debug, Deserialize)]
pub struct PointProperties {
    pub forecast: String,
}

/// Forecast document fetched from the URL inside the points response.
/// Period fields are required, unlike alert properties.
#[derive(Debug, Deserialize)]
pub struct ForecastDocument {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: i32,
    #[serde(rename = "temperatureUnit")]
    pub temperature_unit: String,
    #[serde(rename = "windSpeed")]
    pub wind_speed: String,
    #[serde(rename = "windDirection")]
    pub wind_direction: String,
    #[serde(rename = "detailedForecast")]
    pub detailed_forecast: String,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetAlertsRequest {
    #[schemars(description = "Two-letter US state code (e.g. CA, NY)")]
    pub state: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetForecastRequest {
    #[schemars(description = "Latitude of the location")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location")]
    pub longitude: f64,
}
