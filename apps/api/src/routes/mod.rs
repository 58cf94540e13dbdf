pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::hierarchy::handlers as org_chart;
use crate::positions::handlers as positions;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Org chart
        .route("/api/v1/org-chart", get(org_chart::handle_org_chart))
        .route(
            "/api/v1/org-chart/text",
            get(org_chart::handle_org_chart_text),
        )
        // Positions
        .route(
            "/api/v1/positions",
            get(positions::handle_list_positions).post(positions::handle_create_position),
        )
        .route(
            "/api/v1/positions/:id",
            put(positions::handle_update_position).delete(positions::handle_delete_position),
        )
        // Session
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/login", post(session::handle_login))
        .route("/api/v1/session/logout", post(session::handle_logout))
        .with_state(state)
}
