use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::ApiError;
use crate::services::analytics::Dashboard;
use crate::AppState;

#[derive(Deserialize)]
pub struct JsonDumpQuery {
    /// Pretty-printed unless this is exactly `false`.
    pretty: Option<String>,
}

pub async fn analytics_page() -> Html<&'static str> {
    Html(include_str!("../../static/analytics/index.html"))
}

pub async fn raw_page() -> Html<&'static str> {
    Html(include_str!("../../static/analytics/raw.html"))
}

// Every stored page view as a JSON array
pub async fn page_views_json(
    Query(params): Query<JsonDumpQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let events = state.store.all().await?;

    let body = if params.pretty.as_deref() == Some("false") {
        serde_json::to_vec(&events)?
    } else {
        to_pretty_json(&events)?
    };

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

// Aggregated stats, traffic and breakdowns for the dashboard page
pub async fn dashboard_data(
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, ApiError> {
    let events = state.store.all().await?;
    let dashboard = Dashboard::build(&events, &state.config.site_host);

    tracing::debug!(
        "Dashboard built from {} events over {} days",
        dashboard.stats.record_count,
        dashboard.stats.days_tracked
    );

    Ok(Json(dashboard))
}

// Four-space indentation, matching the dumps the site has always served.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(out)
}
