// Org chart: rebuilds the position hierarchy from the positions store snapshot
// and renders it level by level for the presentation layer.

pub mod builder;
pub mod handlers;
pub mod render;

use serde::Serialize;
use thiserror::Error;

use crate::models::position::{PositionId, PositionRecord};

pub use builder::{build, check_reparent};
pub use render::{render, render_text, RenderedNode};

pub const EMPTY_CHART_MESSAGE: &str = "No positions to display in the org chart.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HierarchyError {
    #[error("Cyclic hierarchy between positions {}", join_ids(.ids))]
    Cycle { ids: Vec<PositionId> },

    #[error("Hierarchy is deeper than {limit} levels")]
    TooDeep { limit: usize },
}

fn join_ids(ids: &[PositionId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Outcome of charting a snapshot. Invalid data is reported through
/// [`HierarchyError`] instead.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrgChart {
    Empty {
        message: &'static str,
    },
    Ok {
        total: usize,
        depth: usize,
        orphans: Vec<PositionId>,
        roots: Vec<RenderedNode>,
    },
}

pub fn org_chart(records: &[PositionRecord], max_depth: usize) -> Result<OrgChart, HierarchyError> {
    if records.is_empty() {
        return Ok(OrgChart::Empty {
            message: EMPTY_CHART_MESSAGE,
        });
    }

    let forest = build(records)?;
    let roots = render(&forest, max_depth)?;
    Ok(OrgChart::Ok {
        total: forest.len(),
        depth: forest.depth(),
        orphans: forest.orphans(),
        roots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_reported_as_empty() {
        let chart = org_chart(&[], 8).unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["status"], "empty");
        assert_eq!(json["message"], EMPTY_CHART_MESSAGE);
    }

    #[test]
    fn test_chart_counts_every_record() {
        let records = vec![
            PositionRecord::new(1, "CEO"),
            PositionRecord::new(2, "CTO").with_parent(1),
            PositionRecord::new(3, "CFO").with_parent(1),
            PositionRecord::new(4, "Contractor").with_parent(77),
        ];
        match org_chart(&records, 8).unwrap() {
            OrgChart::Ok {
                total,
                depth,
                orphans,
                roots,
            } => {
                assert_eq!(total, 4);
                assert_eq!(depth, 2);
                assert_eq!(orphans, vec![PositionId(4)]);
                assert_eq!(roots.len(), 2);
            }
            other => panic!("expected a chart, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_is_an_error_not_an_empty_chart() {
        let records = vec![
            PositionRecord::new(1, "A").with_parent(2),
            PositionRecord::new(2, "B").with_parent(1),
        ];
        let err = org_chart(&records, 8).unwrap_err();
        assert_eq!(err.to_string(), "Cyclic hierarchy between positions 1 -> 2");
    }
}
