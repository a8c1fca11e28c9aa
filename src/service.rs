use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use serde_json::Value;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{
    DEFAULT_FORECAST_PERIODS, FORECAST_PERIODS_ENV, GEO_JSON, NWS_API_BASE,
    REQUEST_TIMEOUT_SECS, USER_AGENT,
};
use crate::formatters::{format_alert, format_forecast};
use crate::models::{
    AlertCollection, ForecastDocument, ForecastPoint, GetAlertsRequest, GetForecastRequest,
};

/// Main weather service that handles MCP requests
#[derive(Clone)]
pub struct Weather {
    client: Arc<Client>,
    api_base: String,
    period_limit: usize,
    tool_router: ToolRouter<Self>,
}

impl Weather {
    /// Creates a service against the live NWS API.
    ///
    /// The forecast period limit defaults to 5 and can be overridden with
    /// the `WEATHER_FORECAST_PERIODS` environment variable.
    pub fn new() -> Result<Self> {
        let period_limit = env::var(FORECAST_PERIODS_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FORECAST_PERIODS);

        Self::with_api_base(NWS_API_BASE, period_limit)
    }

    /// Creates a service against an explicit API base URL.
    pub fn with_api_base(api_base: impl Into<String>, period_limit: usize) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            api_base: api_base.into(),
            period_limit,
            tool_router: Self::tool_router(),
        })
    }

    /// Makes an HTTP GET request and parses the JSON response.
    ///
    /// Collapses every failure (transport, non-2xx status, undecodable body)
    /// into `None`; the cause is logged and discarded.
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        match self.try_fetch_json(url).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("NWS request to {} failed: {}", url, e);
                None
            }
        }
    }

    async fn try_fetch_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("request failed with status: {}", response.status());
        }

        let data = response.json::<Value>().await?;
        Ok(data)
    }
}

#[tool_handler]
impl ServerHandler for Weather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weather-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "A weather information service powered by the National Weather Service API. \
                Provides weather alerts and forecasts for US locations."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl Weather {
    /// Gets active weather alerts for a US state
    #[tool(description = "Get current weather alerts for a US state. Provide a two-letter state code (e.g., 'CA' for California, 'NY' for New York).")]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting alerts for state: {}", request.state);

        let url = format!("{}/alerts/active/area/{}", self.api_base, request.state);

        let Some(data) = self.fetch_json(&url).await else {
            return Ok(CallToolResult::success(vec![Content::text(
                "Unable to fetch alerts or no alerts found.",
            )]));
        };

        let collection: AlertCollection = serde_json::from_value(data).map_err(|e| {
            McpError::internal_error(format!("Unexpected alerts response shape: {}", e), None)
        })?;

        let Some(features) = collection.features else {
            return Ok(CallToolResult::success(vec![Content::text(
                "Unable to fetch alerts or no alerts found.",
            )]));
        };

        if features.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No active alerts for this state.",
            )]));
        }

        let alerts: Vec<String> = features.iter().map(format_alert).collect();

        Ok(CallToolResult::success(vec![Content::text(
            alerts.join("\n---\n"),
        )]))
    }

    /// Gets the weather forecast for a location
    #[tool(description = "Get weather forecast for a US location. Provide latitude and longitude (e.g., latitude: 40.7128, longitude: -74.0060 for New York).")]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting forecast for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        // First get the forecast grid endpoint
        let points_url = format!(
            "{}/points/{},{}",
            self.api_base, request.latitude, request.longitude
        );

        let Some(points) = self.fetch_json(&points_url).await else {
            return Ok(CallToolResult::success(vec![Content::text(
                "Unable to fetch forecast data for this location.",
            )]));
        };

        // The forecast URL is required; a points document without it is
        // upstream schema drift and surfaces as a tool error.
        let point: ForecastPoint = serde_json::from_value(points).map_err(|e| {
            McpError::internal_error(format!("Unexpected points response shape: {}", e), None)
        })?;

        let Some(forecast) = self.fetch_json(&point.properties.forecast).await else {
            return Ok(CallToolResult::success(vec![Content::text(
                "Unable to fetch detailed forecast.",
            )]));
        };

        let document: ForecastDocument = serde_json::from_value(forecast).map_err(|e| {
            McpError::internal_error(format!("Unexpected forecast response shape: {}", e), None)
        })?;

        let formatted = format_forecast(&document.properties.periods, self.period_limit);

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }
}
