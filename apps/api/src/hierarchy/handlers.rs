use axum::{extract::State, http::header, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::hierarchy::{build, org_chart, render_text, OrgChart, EMPTY_CHART_MESSAGE};
use crate::state::AppState;

#[derive(Serialize)]
pub struct OrgChartResponse {
    #[serde(flatten)]
    pub chart: OrgChart,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/v1/org-chart
pub async fn handle_org_chart(
    State(state): State<AppState>,
) -> Result<Json<OrgChartResponse>, AppError> {
    let records = state.positions.list().await?;
    let chart = org_chart(&records, state.config.org_chart_max_depth)?;
    info!(positions = records.len(), "Org chart rendered");
    Ok(Json(OrgChartResponse {
        chart,
        generated_at: Utc::now(),
    }))
}

/// GET /api/v1/org-chart/text
pub async fn handle_org_chart_text(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.positions.list().await?;
    let forest = build(&records)?;
    let body = if forest.is_empty() {
        format!("{EMPTY_CHART_MESSAGE}\n")
    } else {
        render_text(&forest)
    };
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}
