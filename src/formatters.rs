use crate::models::{AlertFeature, AlertProperties, ForecastPeriod};

/// Formats a single weather alert into a human-readable string.
///
/// Total over its input: absent fields render as fixed placeholders.
pub fn format_alert(feature: &AlertFeature) -> String {
    let default_props = AlertProperties::default();
    let props = feature.properties.as_ref().unwrap_or(&default_props);

    format!(
        "**{}**\n*Area:* {}\n\n*Severity:* {}\n{}\n\n**Instructions:** {}",
        props.event.as_deref().unwrap_or("Unknown Event"),
        props.area_desc.as_deref().unwrap_or("Unknown Area"),
        props.severity.as_deref().unwrap_or("Unknown Severity"),
        props
            .description
            .as_deref()
            .unwrap_or("No description available."),
        props
            .instruction
            .as_deref()
            .unwrap_or("No specific instructions provided."),
    )
}

/// Formats up to `limit` forecast periods into a human-readable string.
pub fn format_forecast(periods: &[ForecastPeriod], limit: usize) -> String {
    let rendered: Vec<String> = periods.iter().take(limit).map(format_period).collect();
    rendered.join("\n---\n")
}

fn format_period(period: &ForecastPeriod) -> String {
    format!(
        "**{}**\n- Temperature: {}\u{00b0}{}\n- Wind: {} {}\n- Forecast: {}\n",
        period.name,
        period.temperature,
        period.temperature_unit,
        period.wind_speed,
        period.wind_direction,
        period.detailed_forecast,
    )
}
