/// Visualization module: historical-plus-forecast line chart.
///
/// Produces a self-contained HTML string with inline JS that handles:
/// - The historical monthly series as a solid line
/// - The forecast series for the target year as a dashed line
/// - Hover tooltips with two-decimal grouped values
/// - Y gridlines, month/year axis ticks, and a legend
///
/// All SVG rendering is done client-side by forecast_chart.js. This module
/// extracts the two series, serializes them to JSON, and emits the HTML
/// shell. Use with `IPython.display.HTML` or `st.components.v1.html`.
use std::fmt::Write as FmtWrite;

use chrono::Datelike;

use crate::aggregate::MonthlyPoint;
use crate::forecast::ForecastPoint;
use crate::schema::month_name;

const CHART_JS: &str = include_str!("forecast_chart.js");

// ── Config ──────────────────────────────────────────────────────────────────

/// Pixel dimensions of the chart viewport.
pub struct ChartConfig {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_px: 900,
            height_px: 420,
        }
    }
}

// ── Intermediate data structure ─────────────────────────────────────────────

struct ChartPoint {
    iso_date: String,
    label: String,
    value: f64,
}

fn historical_points(points: &[MonthlyPoint]) -> Vec<ChartPoint> {
    points
        .iter()
        .map(|p| ChartPoint {
            iso_date: p.month_start().format("%Y-%m-%d").to_string(),
            label: point_label(p.month, p.year),
            value: p.total,
        })
        .collect()
}

fn forecast_chart_points(points: &[ForecastPoint]) -> Vec<ChartPoint> {
    points
        .iter()
        .map(|p| ChartPoint {
            iso_date: p.month_start.format("%Y-%m-%d").to_string(),
            label: point_label(p.month, p.month_start.year()),
            value: p.value,
        })
        .collect()
}

fn point_label(month: u32, year: i32) -> String {
    match month_name(month) {
        Some(name) => format!("{name} {year}"),
        None => format!("{year}-{month:02}"),
    }
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: generates a self-contained HTML string.
///
/// The historical series drives the axis range; the forecast line continues
/// it into the target year. An empty historical series yields a short
/// "no data" div instead of a chart.
pub fn generate_forecast_html(
    historical: &[MonthlyPoint],
    forecast: &[ForecastPoint],
    config: &ChartConfig,
) -> String {
    if historical.is_empty() {
        return "<div>No sales data to visualize.</div>".to_string();
    }

    let target_year = forecast
        .first()
        .map(|p| p.month_start.year().to_string())
        .unwrap_or_else(|| "next year".to_string());

    format!(
        r##"<div style="position:relative; width:100%; border:1px solid #dee2e6; border-radius:4px; background:#fff;">
  <div style="padding:4px 8px; border-bottom:1px solid #dee2e6; font-family:sans-serif; font-size:12px; color:#495057;">
    <span style="font-weight:600;">Monthly Sales and Forecast {target_year}</span>
  </div>
  <div style="overflow:auto;">
    <svg id="sfc-svg" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
      <style>
        .grid-line {{ stroke: #e9ecef; stroke-width: 1; }}
        .axis-label {{ font-family: sans-serif; font-size: 10px; fill: #868e96; }}
        .history-line {{ fill: none; stroke: #4dabf7; stroke-width: 2; }}
        .forecast-line {{ fill: none; stroke: #e8590c; stroke-width: 2; stroke-dasharray: 6 4; }}
        .history-dot {{ fill: #339af0; cursor: pointer; }}
        .forecast-dot {{ fill: #e8590c; cursor: pointer; }}
        .legend-label {{ font-family: sans-serif; font-size: 11px; fill: #495057; }}
      </style>
    </svg>
  </div>
  <div id="sfc-tooltip" style="position:absolute; display:none; pointer-events:none; background:#212529; color:#f8f9fa; font-family:sans-serif; font-size:11px; padding:4px 8px; border-radius:3px; white-space:pre;"></div>
</div>
<script>
{chart_js}
SalesChart.create({{
  svgId: "sfc-svg", tooltipId: "sfc-tooltip",
  width: {width}, height: {height},
  historyLabel: "Monthly sales",
  forecastLabel: "Forecast {target_year}",
  history: {history_json},
  forecast: {forecast_json}
}});
</script>"##,
        target_year = target_year,
        width = config.width_px,
        height = config.height_px,
        chart_js = CHART_JS,
        history_json = points_to_json(&historical_points(historical)),
        forecast_json = points_to_json(&forecast_chart_points(forecast)),
    )
}

// ── JSON serialization helpers ──────────────────────────────────────────────

fn points_to_json(points: &[ChartPoint]) -> String {
    let mut s = String::from("[");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r##"{{"d":"{}","label":"{}","v":{}}}"##,
            escape_json(&p.iso_date),
            escape_json(&p.label),
            p.value,
        )
        .unwrap();
    }
    s.push(']');
    s
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::seasonal_averages;
    use crate::forecast::project_next_year;

    fn history() -> Vec<MonthlyPoint> {
        vec![
            MonthlyPoint { year: 2023, month: 1, total: 150.0 },
            MonthlyPoint { year: 2024, month: 1, total: 300.0 },
        ]
    }

    #[test]
    fn emits_chart_shell_with_both_series() {
        let points = history();
        let projected = project_next_year(&points, &seasonal_averages(&points)).unwrap();
        let html = generate_forecast_html(&points, &projected, &ChartConfig::default());

        assert!(html.contains("<svg id=\"sfc-svg\""));
        assert!(html.contains("SalesChart.create"));
        assert!(html.contains("\"d\":\"2023-01-01\""));
        assert!(html.contains("\"d\":\"2025-01-01\""));
        assert!(html.contains("Forecast 2025"));
        assert!(html.contains("January 2023"));
    }

    #[test]
    fn empty_history_yields_a_no_data_div() {
        let html = generate_forecast_html(&[], &[], &ChartConfig::default());
        assert_eq!(html, "<div>No sales data to visualize.</div>");
    }
}
