//! Rendering of a step tree into an interactive node tree.
//!
//! A render pass turns `[StepNode]` into a [`RenderedTree`]: every node gets
//! its depth, a propagated effective-done flag, a node identifier used only
//! for expand/collapse addressing, and an expansion state. Fallback
//! identifiers come from a counter owned by the [`RenderContext`] of that
//! pass, so two renders of the same input are identical.

use crate::locator::ScopedTree;
use crate::model::{wowhead_url, Progress, ProgressTree, StepNode};
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

/// Expand/collapse address of a rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    fn from_step(id: u64) -> Self {
        Self(format!("i{}", id))
    }

    fn fallback(n: usize) -> Self {
        Self(format!("i-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expansion state of an expandable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

impl Expansion {
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed => Expansion::Expanded,
            Expansion::Expanded => Expansion::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, Expansion::Expanded)
    }
}

/// A step node projected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    pub node_id: NodeId,
    pub depth: usize,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Achievement id of the underlying step, when present.
    pub reference_id: Option<u64>,
    pub progress: Option<Progress>,
    pub time: Option<i64>,
    /// The step's own flag, before propagation.
    pub done: bool,
    pub effective_done: bool,
    pub expandable: bool,
    pub expansion: Expansion,
    /// Set by the completed-filter; independent of `expansion`.
    pub filter_hidden: bool,
    pub children: Vec<usize>,
}

impl RenderedNode {
    pub fn reference_url(&self) -> Option<String> {
        self.reference_id.map(wowhead_url)
    }

    pub fn is_expanded(&self) -> bool {
        self.expandable && self.expansion.is_expanded()
    }
}

/// Heading shown above a rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeTitle {
    pub name: String,
    pub done: bool,
    pub reference_id: Option<u64>,
    /// `character-server` label.
    pub subject: Option<String>,
}

impl TreeTitle {
    /// Title text without the completion marker.
    pub fn display_name(&self) -> String {
        match &self.subject {
            Some(subject) => format!("{} ({})", self.name, subject),
            None => self.name.clone(),
        }
    }
}

/// Owns the per-pass state of one render call.
#[derive(Debug, Default)]
pub struct RenderContext {
    next_fallback: usize,
    assigned: HashSet<NodeId>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for a step: `i<id>` when the step has an id not yet used
    /// in this pass, otherwise the next `i-<n>`.
    fn assign(&mut self, step_id: Option<u64>) -> NodeId {
        if let Some(id) = step_id {
            let candidate = NodeId::from_step(id);
            if self.assigned.insert(candidate.clone()) {
                return candidate;
            }
        }
        loop {
            let candidate = NodeId::fallback(self.next_fallback);
            self.next_fallback += 1;
            if self.assigned.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn render_into(
        &mut self,
        steps: &[StepNode],
        depth: usize,
        parent_effective_done: bool,
        nodes: &mut Vec<RenderedNode>,
    ) -> Vec<usize> {
        let mut indices = Vec::with_capacity(steps.len());
        for step in steps {
            let effective_done = parent_effective_done || step.done;
            let index = nodes.len();
            nodes.push(RenderedNode {
                node_id: self.assign(step.id),
                depth,
                name: step.name.clone(),
                description: step.description.clone(),
                icon: step.icon.clone(),
                reference_id: step.id,
                progress: step.progress,
                time: step.time,
                done: step.done,
                effective_done,
                expandable: !step.is_leaf(),
                expansion: Expansion::Collapsed,
                filter_hidden: false,
                children: Vec::new(),
            });
            let children = self.render_into(&step.children, depth + 1, effective_done, nodes);
            nodes[index].children = children;
            indices.push(index);
        }
        indices
    }
}

/// Render result: an arena of nodes stored in pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTree {
    pub title: Option<TreeTitle>,
    roots: Vec<usize>,
    nodes: Vec<RenderedNode>,
    index: HashMap<NodeId, usize>,
    filter_active: bool,
}

impl RenderedTree {
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn nodes(&self) -> &[RenderedNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [RenderedNode] {
        &mut self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&RenderedNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, node_id: &NodeId) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&RenderedNode> {
        self.position(node_id).and_then(|i| self.nodes.get(i))
    }

    pub fn filter_active(&self) -> bool {
        self.filter_active
    }

    pub(crate) fn set_filter_active(&mut self, active: bool) {
        self.filter_active = active;
    }

    /// Flip the expansion of an expandable node.
    ///
    /// Returns the new state, or `None` for unknown ids and leaves.
    pub fn toggle(&mut self, node_id: &NodeId) -> Option<Expansion> {
        let index = self.position(node_id)?;
        self.toggle_at(index)
    }

    pub fn toggle_at(&mut self, index: usize) -> Option<Expansion> {
        let node = self.nodes.get_mut(index)?;
        if !node.expandable {
            return None;
        }
        node.expansion = node.expansion.toggled();
        Some(node.expansion)
    }

    /// Indices of nodes currently shown: roots, plus children of expanded
    /// nodes, minus nodes hidden by the completed-filter.
    pub fn visible_rows(&self) -> Vec<usize> {
        let mut rows = Vec::new();
        self.collect_rows(&self.roots, &mut rows);
        rows
    }

    fn collect_rows(&self, indices: &[usize], rows: &mut Vec<usize>) {
        for &index in indices {
            let node = &self.nodes[index];
            if !node.filter_hidden {
                rows.push(index);
            }
            if node.is_expanded() {
                self.collect_rows(&node.children, rows);
            }
        }
    }
}

/// Render `steps` in a fresh pass.
pub fn render(steps: &[StepNode], parent_effective_done: bool) -> RenderedTree {
    let mut ctx = RenderContext::new();
    let mut nodes = Vec::new();
    let roots = ctx.render_into(steps, 0, parent_effective_done, &mut nodes);
    let index = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.node_id.clone(), i))
        .collect();
    RenderedTree {
        title: None,
        roots,
        nodes,
        index,
        filter_active: false,
    }
}

/// Render a whole backend response, including its title.
pub fn render_progress(tree: &ProgressTree) -> RenderedTree {
    render_progress_with(tree, false)
}

/// Render a tree scoped to one achievement; its steps inherit the located
/// node's effective-done.
pub fn render_scoped(scoped: &ScopedTree) -> RenderedTree {
    render_progress_with(&scoped.tree, scoped.inherited_done)
}

fn render_progress_with(tree: &ProgressTree, parent_effective_done: bool) -> RenderedTree {
    let mut rendered = render(&tree.steps, parent_effective_done);
    rendered.title = Some(TreeTitle {
        name: tree.parent.name.clone(),
        done: tree.parent.done,
        reference_id: tree.parent.id,
        subject: tree.subject(),
    });
    rendered
}
