use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::position::{PositionId, PositionInput, PositionRecord};
use crate::positions::validation::{validate_create, validate_update};
use crate::state::AppState;

/// A position as listed in the positions table, with its superior resolved.
#[derive(Serialize)]
pub struct PositionView {
    #[serde(flatten)]
    pub position: PositionRecord,
    pub superior_name: Option<String>,
}

pub fn with_superior_names(records: Vec<PositionRecord>) -> Vec<PositionView> {
    let names: HashMap<PositionId, String> = records
        .iter()
        .map(|r| (r.id, r.name.clone()))
        .collect();
    records
        .into_iter()
        .map(|position| PositionView {
            superior_name: position.parent_id.and_then(|p| names.get(&p).cloned()),
            position,
        })
        .collect()
}

async fn require_login(state: &AppState) -> Result<String, AppError> {
    state.session.current().await.ok_or(AppError::Unauthorized)
}

/// GET /api/v1/positions
pub async fn handle_list_positions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PositionView>>, AppError> {
    let records = state.positions.list().await?;
    Ok(Json(with_superior_names(records)))
}

/// POST /api/v1/positions
pub async fn handle_create_position(
    State(state): State<AppState>,
    Json(input): Json<PositionInput>,
) -> Result<(StatusCode, Json<PositionRecord>), AppError> {
    require_login(&state).await?;
    let existing = state.positions.list().await?;
    validate_create(&input, &existing)?;
    let created = state.positions.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/positions/:id
pub async fn handle_update_position(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PositionInput>,
) -> Result<Json<PositionRecord>, AppError> {
    require_login(&state).await?;
    let id = PositionId(id);
    let existing = state.positions.list().await?;
    validate_update(id, &input, &existing)?;
    let updated = state.positions.update(id, input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/positions/:id
pub async fn handle_delete_position(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_login(&state).await?;
    state.positions.delete(PositionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superior_names_are_resolved() {
        let views = with_superior_names(vec![
            PositionRecord::new(1, "CEO"),
            PositionRecord::new(2, "CTO").with_parent(1),
            PositionRecord::new(3, "Temp").with_parent(99),
        ]);
        assert_eq!(views[0].superior_name, None);
        assert_eq!(views[1].superior_name.as_deref(), Some("CEO"));
        assert_eq!(views[2].superior_name, None);
    }
}
