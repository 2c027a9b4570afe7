//! Completed-node filter over a rendered tree.
//!
//! The filter only marks nodes; it never touches expansion state or tree
//! topology.

use crate::render::RenderedTree;

/// Outcome of applying the completed-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSummary {
    pub active: bool,
    pub hidden: usize,
    pub shown: usize,
}

/// Hide (or un-hide) every node whose effective-done flag is set.
pub fn set_filter(tree: &mut RenderedTree, active: bool) -> FilterSummary {
    let mut summary = FilterSummary {
        active,
        ..FilterSummary::default()
    };
    for node in tree.nodes_mut() {
        node.filter_hidden = active && node.effective_done;
        if node.filter_hidden {
            summary.hidden += 1;
        } else {
            summary.shown += 1;
        }
    }
    tree.set_filter_active(active);
    summary
}
