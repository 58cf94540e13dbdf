use serde::Serialize;

use crate::hierarchy::builder::{Forest, HierarchyNode};
use crate::hierarchy::HierarchyError;
use crate::models::position::PositionId;

/// Presentation hints for one level of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStyle {
    pub name: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

/// Ordered by level. Levels past the end reuse the last entry.
pub const LEVEL_STYLES: [LevelStyle; 3] = [
    LevelStyle {
        name: "executive",
        background: "bg-blue-100",
        text: "text-blue-800",
    },
    LevelStyle {
        name: "management",
        background: "bg-green-100",
        text: "text-green-800",
    },
    LevelStyle {
        name: "staff",
        background: "bg-gray-100",
        text: "text-gray-800",
    },
];

pub fn style_for_level(level: usize) -> LevelStyle {
    LEVEL_STYLES[level.min(LEVEL_STYLES.len() - 1)]
}

/// Nested chart node handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNode {
    pub id: PositionId,
    pub label: String,
    pub level: usize,
    pub style: LevelStyle,
    pub orphaned: bool,
    pub children: Vec<RenderedNode>,
}

/// One row of the flattened, pre-order chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedLine {
    pub level: usize,
    pub label: String,
    pub style: LevelStyle,
    pub orphaned: bool,
}

/// Renders the forest as a nested tree. Recursion stops with
/// [`HierarchyError::TooDeep`] once a node would sit at `max_depth` or deeper.
pub fn render(forest: &Forest, max_depth: usize) -> Result<Vec<RenderedNode>, HierarchyError> {
    forest
        .roots()
        .iter()
        .map(|root| render_node(root, 0, max_depth))
        .collect()
}

fn render_node(
    node: &HierarchyNode,
    level: usize,
    max_depth: usize,
) -> Result<RenderedNode, HierarchyError> {
    if level >= max_depth {
        return Err(HierarchyError::TooDeep { limit: max_depth });
    }

    let children = node
        .children
        .iter()
        .map(|child| render_node(child, level + 1, max_depth))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderedNode {
        id: node.id(),
        label: node.label(),
        level,
        style: style_for_level(level),
        orphaned: node.orphaned,
        children,
    })
}

pub fn render_lines(forest: &Forest) -> Vec<RenderedLine> {
    forest
        .walk()
        .map(|(level, node)| RenderedLine {
            level,
            label: node.label(),
            style: style_for_level(level),
            orphaned: node.orphaned,
        })
        .collect()
}

/// Plain-text chart, two spaces of indentation per level.
pub fn render_text(forest: &Forest) -> String {
    let mut out = String::new();
    for line in render_lines(forest) {
        out.push_str(&"  ".repeat(line.level));
        out.push_str(&line.label);
        if line.orphaned {
            out.push_str(" (superior not found)");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::builder::build;
    use crate::models::position::PositionRecord;

    fn chain(n: i64) -> Vec<PositionRecord> {
        (0..n)
            .map(|i| {
                let r = PositionRecord::new(i, format!("L{i}"));
                if i == 0 {
                    r
                } else {
                    r.with_parent(i - 1)
                }
            })
            .collect()
    }

    #[test]
    fn test_style_is_clamped_to_deepest_entry() {
        assert_eq!(style_for_level(0).name, "executive");
        assert_eq!(style_for_level(1).name, "management");
        assert_eq!(style_for_level(2).name, "staff");
        assert_eq!(style_for_level(7).name, "staff");
    }

    #[test]
    fn test_chain_longer_than_style_table_reuses_last_style() {
        let forest = build(&chain(6)).unwrap();
        let lines = render_lines(&forest);
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines.iter().map(|l| l.level).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5]
        );
        assert!(lines[2..].iter().all(|l| l.style == LEVEL_STYLES[2]));
    }

    #[test]
    fn test_nested_render_mirrors_forest() {
        let records = vec![
            PositionRecord::new(1, "CEO"),
            PositionRecord::new(2, "CTO")
                .with_parent(1)
                .with_description("Technology"),
            PositionRecord::new(3, "Eng1").with_parent(2),
        ];
        let forest = build(&records).unwrap();
        let roots = render(&forest, 10).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].label, "CEO");
        assert_eq!(roots[0].children[0].label, "CTO - Technology");
        assert_eq!(roots[0].children[0].level, 1);
        assert_eq!(roots[0].children[0].children[0].level, 2);
        assert_eq!(roots[0].children[0].children[0].style.name, "staff");
    }

    #[test]
    fn test_render_stops_at_depth_limit() {
        let forest = build(&chain(5)).unwrap();
        assert!(render(&forest, 5).is_ok());
        assert_eq!(
            render(&forest, 4).unwrap_err(),
            HierarchyError::TooDeep { limit: 4 }
        );
    }

    #[test]
    fn test_text_output_is_indented_and_marks_orphans() {
        let records = vec![
            PositionRecord::new(1, "CEO"),
            PositionRecord::new(2, "CTO").with_parent(1),
            PositionRecord::new(3, "Eng1").with_parent(2),
            PositionRecord::new(4, "Temp").with_parent(42),
        ];
        let forest = build(&records).unwrap();
        assert_eq!(
            render_text(&forest),
            "CEO\n  CTO\n    Eng1\nTemp (superior not found)\n"
        );
    }
}
