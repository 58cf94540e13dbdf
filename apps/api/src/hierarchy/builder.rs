//! Rebuilds the position forest from the flat list served by the positions store.
//!
//! Construction is two passes over the input: index every record by id, then
//! link each record to its superior. Both the link pass and the tree assembly
//! run on indices with an explicit stack, so malformed input can never recurse
//! unboundedly. Cycles are rejected before any tree is assembled.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::hierarchy::HierarchyError;
use crate::models::position::{PositionId, PositionRecord};

/// One position in the org chart together with its direct reports.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub record: PositionRecord,
    /// Direct reports, in the order they appeared in the input.
    pub children: Vec<HierarchyNode>,
    /// Set on roots whose declared superior does not exist in the snapshot.
    pub orphaned: bool,
}

impl HierarchyNode {
    fn new(record: PositionRecord, orphaned: bool) -> Self {
        Self {
            record,
            children: Vec::new(),
            orphaned,
        }
    }

    pub fn id(&self) -> PositionId {
        self.record.id
    }

    pub fn label(&self) -> String {
        self.record.label()
    }
}

/// The rebuilt hierarchy: zero or more independent trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forest {
    roots: Vec<HierarchyNode>,
    len: usize,
}

impl Forest {
    pub fn roots(&self) -> &[HierarchyNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Ids of the roots that were promoted because their superior is unknown.
    pub fn orphans(&self) -> Vec<PositionId> {
        self.roots
            .iter()
            .filter(|r| r.orphaned)
            .map(HierarchyNode::id)
            .collect()
    }

    /// Number of levels in the deepest tree (0 for an empty forest).
    pub fn depth(&self) -> usize {
        self.walk().map(|(level, _)| level + 1).max().unwrap_or(0)
    }

    /// Depth-first pre-order traversal yielding `(level, node)`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().map(|r| (0, r)).collect(),
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, &'a HierarchyNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (level + 1, c)));
        Some((level, node))
    }
}

/// Resolved superior of every record, by index into the input slice.
struct Links {
    parent: Vec<Option<usize>>,
    orphaned: Vec<bool>,
    duplicates: Vec<PositionId>,
}

fn resolve_links(records: &[PositionRecord]) -> Links {
    let mut index: HashMap<PositionId, usize> = HashMap::with_capacity(records.len());
    let mut duplicates = Vec::new();
    for (i, record) in records.iter().enumerate() {
        // Last record wins as the parent target for a repeated id.
        if index.insert(record.id, i).is_some() {
            duplicates.push(record.id);
        }
    }

    let mut parent = Vec::with_capacity(records.len());
    let mut orphaned = Vec::with_capacity(records.len());
    for record in records {
        match record.parent_id {
            None => {
                parent.push(None);
                orphaned.push(false);
            }
            Some(pid) => match index.get(&pid) {
                Some(&j) => {
                    parent.push(Some(j));
                    orphaned.push(false);
                }
                None => {
                    parent.push(None);
                    orphaned.push(true);
                }
            },
        }
    }

    Links {
        parent,
        orphaned,
        duplicates,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Follows every superior chain once. Returns the ids on the first cycle found,
/// in chain order.
fn find_cycle(records: &[PositionRecord], parent: &[Option<usize>]) -> Option<Vec<PositionId>> {
    let mut marks = vec![Mark::Unvisited; parent.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parent.len() {
        let mut cursor = Some(start);
        while let Some(i) = cursor {
            match marks[i] {
                Mark::Done => break,
                Mark::OnPath => {
                    let from = path.iter().position(|&p| p == i).unwrap_or(0);
                    return Some(path[from..].iter().map(|&p| records[p].id).collect());
                }
                Mark::Unvisited => {
                    marks[i] = Mark::OnPath;
                    path.push(i);
                    cursor = parent[i];
                }
            }
        }
        for i in path.drain(..) {
            marks[i] = Mark::Done;
        }
    }

    None
}

/// Builds the forest for a snapshot of positions.
///
/// Records without a superior are roots. Records whose superior is not in the
/// snapshot are promoted to roots and flagged `orphaned`. Any chain of
/// superiors that loops back on itself (including a position reporting to
/// itself) fails with [`HierarchyError::Cycle`].
pub fn build(records: &[PositionRecord]) -> Result<Forest, HierarchyError> {
    let links = resolve_links(records);

    for id in &links.duplicates {
        warn!(position_id = %id, "Duplicate position id; only the last record is a valid superior");
    }

    if let Some(ids) = find_cycle(records, &links.parent) {
        warn!(cycle = ?ids, "Rejecting cyclic position hierarchy");
        return Err(HierarchyError::Cycle { ids });
    }

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut root_indices = Vec::new();
    for (i, parent) in links.parent.iter().enumerate() {
        match parent {
            Some(j) => children_of[*j].push(i),
            None => {
                if links.orphaned[i] {
                    warn!(
                        position_id = %records[i].id,
                        missing_parent = ?records[i].parent_id,
                        "Superior not found; showing position at the top level"
                    );
                }
                root_indices.push(i);
            }
        }
    }

    let mut slots: Vec<Option<HierarchyNode>> = records
        .iter()
        .zip(&links.orphaned)
        .map(|(r, &orphaned)| Some(HierarchyNode::new(r.clone(), orphaned)))
        .collect();

    // Post-order assembly: a node is finished only after all of its reports.
    let mut assembled = 0;
    for &root in &root_indices {
        let mut stack = vec![(root, false)];
        while let Some((i, expanded)) = stack.pop() {
            if expanded {
                assembled += 1;
                let reports: Vec<HierarchyNode> = children_of[i]
                    .iter()
                    .filter_map(|&c| slots[c].take())
                    .collect();
                if let Some(node) = slots[i].as_mut() {
                    node.children = reports;
                }
            } else {
                stack.push((i, true));
                stack.extend(children_of[i].iter().rev().map(|&c| (c, false)));
            }
        }
    }

    let roots: Vec<HierarchyNode> = root_indices
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();

    debug!(
        positions = records.len(),
        roots = roots.len(),
        "Position hierarchy built"
    );

    Ok(Forest {
        roots,
        len: assembled,
    })
}

/// Checks that giving position `id` the superior `new_parent` does not make
/// it its own ancestor. Walks up from `new_parent` only, so loops elsewhere in
/// the snapshot do not block the edit.
pub fn check_reparent(
    records: &[PositionRecord],
    id: PositionId,
    new_parent: Option<PositionId>,
) -> Result<(), HierarchyError> {
    // Last record wins, as in `build`.
    let superior_of: HashMap<PositionId, Option<PositionId>> =
        records.iter().map(|r| (r.id, r.parent_id)).collect();

    let mut chain = vec![id];
    let mut cursor = new_parent;
    for _ in 0..=records.len() {
        let Some(current) = cursor else {
            return Ok(());
        };
        if current == id {
            return Err(HierarchyError::Cycle { ids: chain });
        }
        chain.push(current);
        cursor = superior_of.get(&current).copied().flatten();
    }

    // Chain loops above `new_parent` without passing through `id`.
    Ok(())
}
