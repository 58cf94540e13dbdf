use crate::errors::AppError;
use crate::hierarchy::check_reparent;
use crate::hr_client::HrApiError;
use crate::models::position::{PositionId, PositionInput, PositionRecord};

fn validate_name(input: &PositionInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Position name is required".to_string()));
    }
    Ok(())
}

fn validate_superior_exists(
    parent: Option<PositionId>,
    existing: &[PositionRecord],
) -> Result<(), AppError> {
    if let Some(parent) = parent {
        if !existing.iter().any(|r| r.id == parent) {
            return Err(AppError::Validation(format!(
                "Superior position {parent} does not exist"
            )));
        }
    }
    Ok(())
}

/// Checks a new position against the current snapshot.
pub fn validate_create(input: &PositionInput, existing: &[PositionRecord]) -> Result<(), AppError> {
    validate_name(input)?;
    validate_superior_exists(input.parent_id, existing)
}

/// Checks an edit against the current snapshot, including that the new
/// superior does not sit below the position being edited. An orphaned
/// position keeps its unresolved superior when the edit leaves it unchanged.
pub fn validate_update(
    id: PositionId,
    input: &PositionInput,
    existing: &[PositionRecord],
) -> Result<(), AppError> {
    let current = existing
        .iter()
        .rev()
        .find(|r| r.id == id)
        .ok_or(HrApiError::NotFound(id))?;
    if input.parent_id == Some(id) {
        return Err(AppError::Validation(
            "A position cannot report to itself".to_string(),
        ));
    }

    validate_name(input)?;
    if input.parent_id != current.parent_id {
        validate_superior_exists(input.parent_id, existing)?;
    }
    check_reparent(existing, id, input.parent_id)?;
    Ok(())
}
