//! Web dashboard: HTML console, JSON API and SVG chart

use std::time::Duration;

use axum::extract::State;
use axum::http::{header, Method};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::StateHandle;
use crate::view::{escape_html, render_chart_svg, BannerTone, StatusView};

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardContext {
    pub state: StateHandle,
    pub refresh_ms: u64,
}

/// Build the dashboard axum router.
///
/// The page re-fetches its data every `refresh`, normally the poll interval.
pub fn build_router(state: StateHandle, refresh: Duration) -> Router {
    let context = DashboardContext {
        state,
        refresh_ms: refresh.as_millis() as u64,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let api = Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/history", get(history_handler))
        .layer(cors);

    Router::new()
        .route("/", get(index_handler))
        .route("/chart.svg", get(chart_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .with_state(context)
}

fn banner_style(tone: BannerTone) -> String {
    let (color, bg, border) = tone.colors();
    format!(
        "padding: 0.5rem 1rem; border-radius: 9999px; font-weight: 700; \
         color: {}; background-color: {}; border: 1px solid {};",
        color, bg, border
    )
}

fn tone_script_map() -> String {
    [BannerTone::Critical, BannerTone::Warning, BannerTone::Nominal]
        .iter()
        .map(|tone| {
            let (color, bg, border) = tone.colors();
            format!(
                "'{}': ['{}', '{}', '{}']",
                tone.css_class(),
                color,
                bg,
                border
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn index_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let (view, chart) = {
        let state = dashboard.state.read().await;
        (StatusView::from_state(&state), render_chart_svg(&state.history))
    };

    let anomaly_color = if view.is_anomaly { "#ef4444" } else { "#e2e8f0" };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>EquipGuard</title>
    <script>
        const TONES = {{ {tones} }};
        function refreshData() {{
            fetch('/api/status')
                .then(r => r.json())
                .then(view => {{
                    const banner = document.getElementById('status-banner');
                    const cls = 'banner-' + view.banner_tone;
                    const [color, bg, border] = TONES[cls] || TONES['banner-nominal'];
                    banner.className = cls;
                    banner.style.color = color;
                    banner.style.backgroundColor = bg;
                    banner.style.borderColor = border;
                    banner.textContent = view.banner_text;
                    const anomaly = document.getElementById('anomaly');
                    anomaly.textContent = view.anomaly_text;
                    anomaly.style.color = view.is_anomaly ? '#ef4444' : '#e2e8f0';
                    document.getElementById('live-temperature').textContent = view.live_temperature;
                }})
                .catch(e => console.error('Status refresh failed', e));
            fetch('/chart.svg')
                .then(r => r.text())
                .then(svg => {{ document.getElementById('chart').innerHTML = svg; }})
                .catch(e => console.error('Chart refresh failed', e));
        }}
        setInterval(refreshData, {refresh_ms});
    </script>
</head>
<body style="font-family: system-ui, sans-serif; background: #020617; color: #fff; margin: 0; padding: 2rem;">
    <header style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 2rem;">
        <div>
            <h1 style="color: #60a5fa; margin: 0;">EquipGuard</h1>
            <p style="color: #94a3b8; margin: 0.25rem 0 0;">Real-time Predictive Maintenance Console</p>
        </div>
        <div id="status-banner" class="{banner_class}" style="{banner_style}">{banner_text}</div>
    </header>
    <div style="display: grid; grid-template-columns: 1fr 2fr; gap: 1.5rem;">
        <div>
            <section style="background: #0f172a; padding: 1.5rem; border-radius: 0.75rem; border: 1px solid #1e293b; margin-bottom: 1.5rem;">
                <h3 style="color: #94a3b8; margin-top: 0;">Anomaly Detection</h3>
                <p id="anomaly" style="font-size: 2.25rem; font-family: monospace; margin: 0; color: {anomaly_color};">{anomaly_text}</p>
            </section>
            <section style="background: #0f172a; padding: 1.5rem; border-radius: 0.75rem; border: 1px solid #1e293b;">
                <h3 style="color: #94a3b8; margin-top: 0;">Live Temperature</h3>
                <p id="live-temperature" style="font-size: 2.25rem; font-family: monospace; margin: 0; color: #60a5fa;">{live_temperature}</p>
            </section>
        </div>
        <section style="background: #0f172a; padding: 1.5rem; border-radius: 0.75rem; border: 1px solid #1e293b;">
            <h3 style="color: #94a3b8; margin-top: 0;">Live Sensor Telemetry</h3>
            <div id="chart">{chart}</div>
        </section>
    </div>
</body>
</html>"#,
        tones = tone_script_map(),
        refresh_ms = dashboard.refresh_ms,
        banner_class = view.banner_tone.css_class(),
        banner_style = banner_style(view.banner_tone),
        banner_text = escape_html(&view.banner_text),
        anomaly_color = anomaly_color,
        anomaly_text = view.anomaly_text,
        live_temperature = view.live_temperature,
        chart = chart,
    );

    Html(html)
}

async fn status_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    axum::Json(StatusView::from_state(&state))
}

async fn history_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    axum::Json(state.history.iter().cloned().collect::<Vec<_>>())
}

async fn chart_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let svg = render_chart_svg(&dashboard.state.read().await.history);
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
