//! Markdown checklist export of the visible part of a rendered tree.
//!
//! Export reads the [`RenderedTree`] model directly. A node is skipped when
//! the completed-filter hides it; its children are still visited and each
//! is judged on its own flags. Expansion state does not affect export.

use crate::render::{RenderedNode, RenderedTree};
use std::fmt::Write as _;

/// H1 of every exported document.
pub const EXPORT_TITLE: &str = "Achievement Progress";

/// File name used when the export is saved to disk.
pub const EXPORT_FILE_NAME: &str = "achievements.md";

/// Serialize the visible nodes of `tree` as an indented markdown checklist.
pub fn export_visible(tree: &RenderedTree, filter_active: bool) -> String {
    let mut md = format!("# {}\n\n", EXPORT_TITLE);
    if let Some(title) = &tree.title {
        if !title.name.trim().is_empty() {
            let _ = write!(md, "## {}\n\n", title.display_name());
        }
    }
    write_nodes(tree, tree.roots(), filter_active, &mut md);
    md
}

fn write_nodes(tree: &RenderedTree, indices: &[usize], filter_active: bool, md: &mut String) {
    for &index in indices {
        let Some(node) = tree.node(index) else {
            continue;
        };
        if !is_hidden(node, filter_active) {
            write_bullet(node, md);
        }
        write_nodes(tree, &node.children, filter_active, md);
    }
}

fn is_hidden(node: &RenderedNode, filter_active: bool) -> bool {
    node.filter_hidden || (filter_active && node.effective_done)
}

fn write_bullet(node: &RenderedNode, md: &mut String) {
    let indent = "  ".repeat(node.depth);
    let checkbox = if node.effective_done { "[x]" } else { "[ ]" };
    let _ = write!(md, "{}- {} {}", indent, checkbox, node.name.trim());
    if let Some(progress) = node.progress {
        let _ = write!(md, " ({}/{})", progress.count, progress.total);
    }
    if let Some(url) = node.reference_url() {
        let _ = write!(md, " [Wowhead]({})", url);
    }
    if let Some(desc) = &node.description {
        let _ = write!(md, " — {}", desc.trim());
    }
    md.push('\n');
}
