//! Web dashboard with the broadcast overlay page and JSON API endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::tracker::SlotTracker;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub tracker: Arc<SlotTracker>,
}

/// Build the dashboard axum router.
///
/// CORS is wide open: the overlay page is embedded by the broadcast
/// tooling from a different origin.
pub fn build_router(tracker: Arc<SlotTracker>) -> Router {
    let dashboard_state = DashboardState { tracker };

    Router::new()
        .route("/", get(overlay_handler))
        .route("/api/slots", get(slots_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(dashboard_state)
}

#[derive(Debug, Deserialize)]
struct SlotsQuery {
    #[serde(default)]
    force: bool,
}

/// Serve the current slot count, refreshing it first.
///
/// An unforced refresh is a no-op once a value is cached, so page views hit
/// the backend only while the cache is cold; `?force=true` always refetches.
/// A coalesced or failed refresh still answers with the current snapshot.
async fn slots_handler(
    State(dashboard): State<DashboardState>,
    Query(query): Query<SlotsQuery>,
) -> impl IntoResponse {
    dashboard.tracker.refresh(query.force).await;

    let state = dashboard.tracker.snapshot();
    axum::Json(serde_json::json!({
        "slots_left": state.slots_left,
        "loading": state.loading,
        "capacity": dashboard.tracker.capacity(),
    }))
}

async fn overlay_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.tracker.snapshot();
    let capacity = dashboard.tracker.capacity();

    let slots_display = match state.slots_left {
        Some(left) => left.to_string(),
        None => "–".to_string(),
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Team Open Signup Slots</title>
    <script>
        function refreshSlots() {{
            fetch('/api/slots?force=true')
                .then(r => r.json())
                .then(data => {{
                    const value = document.getElementById('slots-value');
                    value.textContent = data.slots_left === null ? '–' : data.slots_left;
                    value.style.color = data.slots_left !== null && data.slots_left <= 0 ? '#dc3545' : '#212529';
                }});
        }}
        setInterval(refreshSlots, 5000);
    </script>
</head>
<body style="font-family: system-ui, sans-serif; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; margin: 0;">
    <div style="font-size: 1.5rem; color: #6c757d;">Free signup slots</div>
    <div id="slots-value" style="font-size: 8rem; font-weight: 700;">{slots_display}</div>
    <div style="font-size: 1.25rem; color: #6c757d;">of {capacity} total</div>
</body>
</html>"#,
        slots_display = slots_display,
        capacity = capacity,
    );

    Html(html)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
