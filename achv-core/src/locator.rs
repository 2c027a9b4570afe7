//! Lookup of a single node inside a progress tree.
//!
//! Search is depth-first, pre-order and first-match-wins. Ids are expected
//! to be unique across a tree but nothing enforces it, so the order is part
//! of the contract.

use crate::model::{ParentInfo, ProgressTree, StepNode};
use serde::{Deserialize, Serialize};

/// Find the first node with `id` in `steps` (pre-order).
pub fn find(steps: &[StepNode], id: u64) -> Option<&StepNode> {
    for step in steps {
        if step.id == Some(id) {
            return Some(step);
        }
        if let Some(found) = find(&step.children, id) {
            return Some(found);
        }
    }
    None
}

impl ProgressTree {
    /// Find a node by id among this tree's steps.
    pub fn find(&self, id: u64) -> Option<&StepNode> {
        find(&self.steps, id)
    }
}

/// A progress tree scoped to one achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedTree {
    pub tree: ProgressTree,
    /// Effective-done of the located node; its steps render under it.
    pub inherited_done: bool,
}

impl ScopedTree {
    /// The whole tree, unscoped. Top-level steps inherit nothing.
    pub fn whole(tree: ProgressTree) -> Self {
        Self {
            tree,
            inherited_done: false,
        }
    }
}

/// Like [`find`], also returning the node's effective-done flag.
fn find_with_done(steps: &[StepNode], id: u64, parent_done: bool) -> Option<(&StepNode, bool)> {
    for step in steps {
        let done = parent_done || step.done;
        if step.id == Some(id) {
            return Some((step, done));
        }
        if let Some(found) = find_with_done(&step.children, id, done) {
            return Some(found);
        }
    }
    None
}

/// Re-root a tree at the achievement `id`.
///
/// The tree's own parent matches first and yields the whole tree. Otherwise
/// the located node becomes the parent, its children the steps, and its
/// effective-done in the full tree is carried over so the scoped view marks
/// the same nodes done. Returns `None` on a miss.
pub fn reroot(tree: &ProgressTree, id: u64) -> Option<ScopedTree> {
    if tree.parent.id == Some(id) {
        return Some(ScopedTree::whole(tree.clone()));
    }
    let (node, done) = find_with_done(&tree.steps, id, false)?;
    Some(ScopedTree {
        tree: ProgressTree {
            parent: ParentInfo {
                id: node.id,
                name: node.name.clone(),
                done,
                description: node.description.clone(),
                icon: node.icon.clone(),
                time: node.time,
            },
            character: tree.character.clone(),
            server: tree.server.clone(),
            server_name: tree.server_name.clone(),
            steps: node.children.clone(),
        },
        inherited_done: done,
    })
}

/// Progress of one direct criterion of an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionProgress {
    pub id: Option<u64>,
    pub name: String,
    pub done: bool,
    pub count: u64,
    pub total: u64,
}

/// Flat progress summary for one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub done: bool,
    pub time: Option<i64>,
    pub progress: Vec<CriterionProgress>,
}

impl AchievementProgress {
    pub fn from_node(node: &StepNode) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            description: node.description.clone(),
            done: node.done,
            time: node.time,
            progress: node
                .children
                .iter()
                .map(|c| CriterionProgress {
                    id: c.id,
                    name: c.name.clone(),
                    done: c.done,
                    count: c.progress.map(|p| p.count).unwrap_or(0),
                    total: c.progress.map(|p| p.total).unwrap_or(0),
                })
                .collect(),
        }
    }

    /// Number of direct criteria marked done.
    pub fn completed_criteria(&self) -> usize {
        self.progress.iter().filter(|c| c.done).count()
    }
}

/// Locate `id` in `tree` and summarize its direct criteria.
pub fn achievement_progress(tree: &ProgressTree, id: u64) -> Option<AchievementProgress> {
    tree.find(id).map(AchievementProgress::from_node)
}
