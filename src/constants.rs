/// User agent string for HTTP requests
pub const USER_AGENT: &str = "weather-app/1.0";

/// National Weather Service API base URL
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Accept header value the NWS API expects
pub const GEO_JSON: &str = "application/geo+json";

/// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of forecast periods rendered per request
pub const DEFAULT_FORECAST_PERIODS: usize = 5;

/// Environment variable overriding the forecast period limit
pub const FORECAST_PERIODS_ENV: &str = "WEATHER_FORECAST_PERIODS";
