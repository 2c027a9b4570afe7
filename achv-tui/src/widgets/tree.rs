//! Collapsible progress tree widget.

use achv_core::{Progress, RenderedNode};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// One visible row of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub depth: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub done: bool,
    pub progress: Option<Progress>,
}

impl From<&RenderedNode> for TreeItem {
    fn from(node: &RenderedNode) -> Self {
        Self {
            label: node.name.clone(),
            depth: node.depth,
            expandable: node.expandable,
            expanded: node.is_expanded(),
            done: node.effective_done,
            progress: node.progress,
        }
    }
}

impl TreeItem {
    /// Row text without styling: indent, fold marker, checkbox, label, counter.
    pub fn text(&self) -> String {
        let indent = "  ".repeat(self.depth);
        let marker = match (self.expandable, self.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        let check = if self.done { "[x]" } else { "[ ]" };
        let counter = self
            .progress
            .map(|p| format!(" ({}/{})", p.count, p.total))
            .unwrap_or_default();
        format!("{}{}{} {}{}", indent, marker, check, self.label, counter)
    }
}

#[derive(Debug, Clone)]
pub struct TreeStyle {
    pub open: Style,
    pub done: Style,
    pub selected: Style,
}

pub struct TreeWidget<'a> {
    pub title: &'a str,
    pub items: &'a [TreeItem],
    pub selected: Option<usize>,
    pub style: TreeStyle,
    pub border: Style,
}

impl<'a> TreeWidget<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let rows: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let style = if item.done {
                    self.style.done
                } else {
                    self.style.open
                };
                ListItem::new(Line::from(Span::styled(item.text(), style)))
            })
            .collect();

        let list = List::new(rows)
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border),
            )
            .highlight_style(self.style.selected);

        let mut state = ListState::default();
        state.select(self.selected);
        f.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_text() {
        let item = TreeItem {
            label: "Quests".to_string(),
            depth: 1,
            expandable: true,
            expanded: false,
            done: false,
            progress: Some(Progress { count: 40, total: 90 }),
        };
        assert_eq!(item.text(), "  ▸ [ ] Quests (40/90)");

        let leaf = TreeItem {
            expandable: false,
            done: true,
            progress: None,
            depth: 0,
            ..item
        };
        assert_eq!(leaf.text(), "  [x] Quests");
    }
}
