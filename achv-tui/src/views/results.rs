//! Results panel: progress tree and selected node detail.

use crate::state::{App, Focus};
use crate::theme::completion_color;
use crate::views::panel_border;
use crate::widgets::{DetailPanel, ProgressBar, TreeItem, TreeStyle, TreeWidget};
use achv_core::RenderedTree;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(tree) = app.results.tree.as_ref().filter(|tree| !tree.is_empty()) else {
        render_placeholder(f, app, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_tree(f, app, tree, columns[0]);
    render_detail(f, app, columns[1]);
}

fn render_placeholder(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, color) = match &app.results.message {
        Some(message) => (message.clone(), app.palette.warning),
        None => (
            "Enter a region, realm and character, then press Enter.".to_string(),
            app.palette.text_dim,
        ),
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Progress ")
                .borders(Borders::ALL)
                .border_style(panel_border(app, Focus::Results)),
        );
    f.render_widget(paragraph, area);
}

fn render_tree(f: &mut Frame<'_>, app: &App, tree: &RenderedTree, area: Rect) {
    let items: Vec<TreeItem> = tree
        .visible_rows()
        .into_iter()
        .filter_map(|index| tree.node(index))
        .map(TreeItem::from)
        .collect();
    let title = match &tree.title {
        Some(title) => {
            let marker = if title.done { " ✓" } else { "" };
            format!(" {}{} ", title.display_name(), marker)
        }
        None => " Progress ".to_string(),
    };
    let selected = (!items.is_empty()).then_some(app.results.selected);

    let widget = TreeWidget {
        title: &title,
        items: &items,
        selected,
        style: TreeStyle {
            open: Style::default().fg(completion_color(false, &app.palette)),
            done: Style::default().fg(completion_color(true, &app.palette)),
            selected: Style::default()
                .bg(app.palette.bg_highlight)
                .add_modifier(Modifier::BOLD),
        },
        border: panel_border(app, Focus::Results),
    };
    widget.render(f, area);
}

fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(node) = app.selected_node() else {
        return;
    };

    let gauge_height = if node.progress.is_some() { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(gauge_height)])
        .split(area);

    let mut fields = vec![("Name", node.name.clone())];
    let status = match (node.done, node.effective_done) {
        (true, _) => "Completed",
        (false, true) => "Completed (via parent)",
        (false, false) => "In progress",
    };
    fields.push(("Status", status.to_string()));
    if let Some(id) = node.reference_id {
        fields.push(("ID", id.to_string()));
    }
    if let Some(description) = &node.description {
        fields.push(("Description", description.clone()));
    }
    if let Some(time) = node.time.and_then(DateTime::<Utc>::from_timestamp_millis) {
        fields.push(("Earned", time.format("%Y-%m-%d").to_string()));
    }
    if let Some(url) = node.reference_url() {
        fields.push(("Wowhead", url));
    }

    let mut extra = Vec::new();
    if let Some(progress) = app.selected_progress() {
        if !progress.progress.is_empty() {
            extra.push(Line::from(Span::styled(
                format!(
                    "Criteria {}/{}",
                    progress.completed_criteria(),
                    progress.progress.len()
                ),
                Style::default().fg(app.palette.secondary),
            )));
            for criterion in &progress.progress {
                let check = if criterion.done { "[x]" } else { "[ ]" };
                let counter = if criterion.total > 0 {
                    format!(" {}/{}", criterion.count, criterion.total)
                } else {
                    String::new()
                };
                extra.push(Line::from(Span::styled(
                    format!("{} {}{}", check, criterion.name, counter),
                    Style::default().fg(completion_color(criterion.done, &app.palette)),
                )));
            }
        }
    }

    let panel = DetailPanel {
        title: " Details ",
        fields,
        extra,
        label_style: Style::default().fg(app.palette.secondary),
        border: Style::default().fg(app.palette.border),
    };
    panel.render(f, rows[0]);

    if let Some(progress) = node.progress {
        ProgressBar::from_progress(" Progress ", progress, &app.palette).render(f, rows[1]);
    }
}
