//! Rendering rules for the dashboard: banner tone, labels and the telemetry chart

use std::collections::VecDeque;
use std::fmt::Write as _;

use serde::Serialize;

use crate::prediction::HealthStatus;
use crate::state::{DashboardState, HistoryPoint};

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 40.0;
const GRID_LINES: usize = 4;
const Y_STEP: f64 = 20.0;
const TEMPERATURE_COLOR: &str = "#3b82f6";
const VIBRATION_COLOR: &str = "#10b981";

/// Color class of the status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerTone {
    Critical,
    Warning,
    Nominal,
}

impl BannerTone {
    pub fn for_status(status: &HealthStatus) -> Self {
        match status {
            HealthStatus::Critical => BannerTone::Critical,
            HealthStatus::Warning => BannerTone::Warning,
            _ => BannerTone::Nominal,
        }
    }

    /// (text, background, border)
    pub fn colors(self) -> (&'static str, &'static str, &'static str) {
        match self {
            BannerTone::Critical => ("#f87171", "rgba(239, 68, 68, 0.2)", "#ef4444"),
            BannerTone::Warning => ("#facc15", "rgba(234, 179, 8, 0.2)", "#eab308"),
            BannerTone::Nominal => ("#4ade80", "rgba(34, 197, 94, 0.2)", "#22c55e"),
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            BannerTone::Critical => "banner-critical",
            BannerTone::Warning => "banner-warning",
            BannerTone::Nominal => "banner-nominal",
        }
    }
}

pub fn banner_text(status: &HealthStatus) -> String {
    format!("Status: {}", status.as_str().to_uppercase())
}

pub fn anomaly_text(is_anomaly: bool) -> &'static str {
    if is_anomaly {
        "DETECTED"
    } else {
        "Normal"
    }
}

/// Last recorded temperature, or a placeholder before the first success
pub fn live_temperature_text(latest: Option<&HistoryPoint>) -> String {
    match latest {
        Some(point) => format!("{:.1}°C", point.temperature),
        None => "--°C".to_string(),
    }
}

/// Everything the page shows apart from the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub status: HealthStatus,
    pub is_anomaly: bool,
    pub banner_tone: BannerTone,
    pub banner_text: String,
    pub anomaly_text: String,
    pub live_temperature: String,
    pub history_len: usize,
}

impl StatusView {
    pub fn from_state(state: &DashboardState) -> Self {
        Self {
            status: state.status.clone(),
            is_anomaly: state.is_anomaly,
            banner_tone: BannerTone::for_status(&state.status),
            banner_text: banner_text(&state.status),
            anomaly_text: anomaly_text(state.is_anomaly).to_string(),
            live_temperature: live_temperature_text(state.latest()),
            history_len: state.history.len(),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Upper bound of the y axis: the largest value rounded up to a multiple of 20
fn y_axis_max(history: &VecDeque<HistoryPoint>) -> f64 {
    let peak = history
        .iter()
        .flat_map(|p| [p.temperature, p.vibration])
        .fold(0.0_f64, f64::max);
    ((peak / Y_STEP).ceil() * Y_STEP).max(Y_STEP)
}

fn polyline(points: &[(f64, f64)], color: &str, width: u32) -> String {
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect();
    format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" points="{}"/>"#,
        color,
        width,
        coords.join(" ")
    )
}

/// Render temperature and vibration over the retained window as SVG
pub fn render_chart_svg(history: &VecDeque<HistoryPoint>) -> String {
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = y_axis_max(history);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" aria-label="Live Sensor Telemetry">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );

    for i in 0..=GRID_LINES {
        let value = y_max * i as f64 / GRID_LINES as f64;
        let y = MARGIN_TOP + plot_height - plot_height * i as f64 / GRID_LINES as f64;
        let _ = write!(
            svg,
            r##"<line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="#334155" stroke-dasharray="3 3"/><text x="{tx}" y="{ty:.1}" fill="#94a3b8" font-size="11" text-anchor="end">{value:.0}</text>"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_width,
            tx = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
        );
    }

    if history.is_empty() {
        let _ = write!(
            svg,
            r##"<text x="{x}" y="{y}" fill="#94a3b8" font-size="14" text-anchor="middle">Waiting for telemetry...</text>"##,
            x = MARGIN_LEFT + plot_width / 2.0,
            y = MARGIN_TOP + plot_height / 2.0,
        );
        svg.push_str("</svg>");
        return svg;
    }

    let n = history.len();
    let x_at = |i: usize| {
        if n == 1 {
            MARGIN_LEFT + plot_width / 2.0
        } else {
            MARGIN_LEFT + plot_width * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: f64| MARGIN_TOP + plot_height - plot_height * (v / y_max);

    let temperature: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, p)| (x_at(i), y_at(p.temperature)))
        .collect();
    let vibration: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, p)| (x_at(i), y_at(p.vibration)))
        .collect();

    svg.push_str(&polyline(&temperature, TEMPERATURE_COLOR, 3));
    svg.push_str(&polyline(&vibration, VIBRATION_COLOR, 2));

    for (i, point) in history.iter().enumerate() {
        if i % 4 != 0 && i != n - 1 {
            continue;
        }
        let _ = write!(
            svg,
            r##"<text x="{x:.1}" y="{y}" fill="#94a3b8" font-size="11" text-anchor="middle">{label}</text>"##,
            x = x_at(i),
            y = CHART_HEIGHT - MARGIN_BOTTOM + 18.0,
            label = escape_html(&point.timestamp),
        );
    }

    let _ = write!(
        svg,
        r##"<text x="{x}" y="{y}" fill="{tc}" font-size="12">temp</text><text x="{x2}" y="{y}" fill="{vc}" font-size="12">vib</text>"##,
        x = MARGIN_LEFT,
        x2 = MARGIN_LEFT + 48.0,
        y = CHART_HEIGHT - 6.0,
        tc = TEMPERATURE_COLOR,
        vc = VIBRATION_COLOR,
    );

    svg.push_str("</svg>");
    svg
}
