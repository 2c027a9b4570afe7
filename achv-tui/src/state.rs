//! Application state.
//!
//! `App` holds everything the views draw. It never performs I/O itself:
//! [`App::handle_action`] returns an [`Effect`] for the event loop to carry
//! out, and the loop reports back through the `finish_*` methods.

use crate::config::TuiConfig;
use crate::events::{LookupOutcome, LookupRequest, RealmsOutcome};
use crate::export::{ExportDelivery, ExportError};
use crate::fetcher::FetchError;
use crate::keys::Action;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::realms::RealmDirectory;
use crate::requests::{InFlight, RequestTracker};
use crate::theme::Palette;
use achv_core::{
    achievement_progress, export_visible, parse_achievement_id, render_scoped, reroot, set_filter,
    AchievementIdError, AchievementProgress, Identity, IdentityError, ProgressTree, Region,
    RenderedNode, RenderedTree, ScopedTree, SUGGESTED_ACHIEVEMENTS,
};
use achv_storage::{Clock, SystemClock};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Form,
    Results,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Region,
    Realm,
    Character,
    Achievement,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Region,
            FormField::Realm,
            FormField::Character,
            FormField::Achievement,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Region => "Region",
            FormField::Realm => "Realm",
            FormField::Character => "Character",
            FormField::Achievement => "Achievement",
        }
    }

    pub fn next(&self) -> FormField {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> FormField {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    AchievementId(#[from] AchievementIdError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupForm {
    pub region: Region,
    pub realm: String,
    pub character: String,
    /// Optional achievement id, as typed.
    pub achievement: String,
    pub focused: FormField,
}

impl LookupForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Region => self.region.as_str(),
            FormField::Realm => &self.realm,
            FormField::Character => &self.character,
            FormField::Achievement => &self.achievement,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Region => None,
            FormField::Realm => Some(&mut self.realm),
            FormField::Character => Some(&mut self.character),
            FormField::Achievement => Some(&mut self.achievement),
        }
    }

    pub fn request(&self) -> Result<LookupRequest, FormError> {
        let identity = Identity::new(self.region.as_str(), &self.realm, &self.character)?;
        let achievement_id = if self.achievement.trim().is_empty() {
            None
        } else {
            Some(parse_achievement_id(&self.achievement)?)
        };
        Ok(LookupRequest {
            identity,
            achievement_id,
        })
    }

    fn cycle_suggestion(&mut self, forward: bool) {
        let len = SUGGESTED_ACHIEVEMENTS.len();
        let current = SUGGESTED_ACHIEVEMENTS
            .iter()
            .position(|s| s.id.to_string() == self.achievement.trim());
        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        if let Some(suggestion) = SUGGESTED_ACHIEVEMENTS.get(next) {
            self.achievement = suggestion.id.to_string();
        }
    }

    /// Name of the suggested achievement currently entered, if any.
    pub fn suggestion_name(&self) -> Option<&'static str> {
        let id = parse_achievement_id(&self.achievement).ok()?;
        SUGGESTED_ACHIEVEMENTS
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name)
    }
}

/// What is currently shown in the results panel.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    /// The tree behind the view, already scoped to the requested achievement.
    pub source: Option<ProgressTree>,
    pub tree: Option<RenderedTree>,
    pub request: Option<LookupRequest>,
    /// Position within the visible rows.
    pub selected: usize,
    /// Inline message shown instead of a tree (not found, lookup miss).
    pub message: Option<String>,
}

/// Work the event loop must perform on behalf of the app.
#[derive(Debug)]
pub enum Effect {
    Quit,
    Lookup {
        request: LookupRequest,
        guard: InFlight,
    },
    LoadRealms {
        region: Region,
        guard: InFlight,
    },
    Export(String),
}

pub struct App {
    pub config: TuiConfig,
    pub palette: Palette,
    pub focus: Focus,
    pub form_visible: bool,
    pub form: LookupForm,
    pub results: ResultsView,
    pub hide_completed: bool,
    pub realms: RealmDirectory,
    pub lookups: RequestTracker,
    pub realm_loads: RequestTracker,
    pub notifications: Vec<Notification>,
    /// Ticks since start, drives the loading spinner.
    pub ticks: u64,
    clock: Arc<dyn Clock>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TuiConfig, clock: Arc<dyn Clock>) -> Self {
        let palette = config.palette();
        let form = LookupForm {
            region: config.region(),
            ..LookupForm::default()
        };
        Self {
            config,
            palette,
            focus: Focus::Form,
            form_visible: true,
            form,
            results: ResultsView::default(),
            hide_completed: false,
            realms: RealmDirectory::new(),
            lookups: RequestTracker::new(),
            realm_loads: RequestTracker::new(),
            notifications: Vec::new(),
            ticks: 0,
            clock,
        }
    }

    pub fn restore(&mut self, state: &PersistedState) {
        self.form.region = state.region;
        self.form.realm = state.realm.clone();
        self.form.character = state.character.clone();
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            region: self.form.region,
            realm: self.form.realm.trim().to_string(),
            character: self.form.character.trim().to_string(),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let now = self.clock.now();
        self.notifications.push(Notification::at(level, message, now));
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        self.prune_notifications();
    }

    /// Drop notifications that have been on screen long enough.
    pub fn prune_notifications(&mut self) {
        let now = self.clock.now();
        self.notifications.retain(|n| !n.is_expired(now));
    }

    pub fn is_loading(&self) -> bool {
        self.lookups.in_flight()
    }

    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => return Some(Effect::Quit),
            Action::SwitchFocus => self.switch_focus(),
            Action::ToggleForm => {
                self.form_visible = !self.form_visible;
                if !self.form_visible {
                    self.focus = Focus::Results;
                }
            }
            Action::NextField => self.form.focused = self.form.focused.next(),
            Action::PrevField => self.form.focused = self.form.focused.previous(),
            Action::CycleNext => return self.cycle(true),
            Action::CyclePrev => return self.cycle(false),
            Action::Input(c) => {
                if let Some(text) = self.form.text_mut() {
                    text.push(c);
                }
            }
            Action::Backspace => {
                if let Some(text) = self.form.text_mut() {
                    text.pop();
                }
            }
            Action::Submit => return self.submit(),
            Action::MoveUp => self.select_previous(),
            Action::MoveDown => self.select_next(),
            Action::ToggleNode => self.toggle_selected(),
            Action::ToggleCompleted => self.toggle_hide_completed(),
            Action::Export => return self.export(),
        }
        None
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Form => Focus::Results,
            Focus::Results => {
                self.form_visible = true;
                Focus::Form
            }
        };
    }

    fn cycle(&mut self, forward: bool) -> Option<Effect> {
        match self.form.focused {
            FormField::Region => {
                self.form.region = if forward {
                    self.form.region.next()
                } else {
                    self.form.region.previous()
                };
                self.form.realm.clear();
                self.begin_realm_load()
            }
            FormField::Realm => {
                let region = self.form.region;
                match self.realms.cycle(region, &self.form.realm, forward) {
                    Some(realm) => {
                        self.form.realm = realm.slug.clone();
                        None
                    }
                    None => self.begin_realm_load(),
                }
            }
            FormField::Achievement => {
                self.form.cycle_suggestion(forward);
                None
            }
            FormField::Character => None,
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        if self.lookups.in_flight() {
            self.notify(NotificationLevel::Warning, "A lookup is already running");
            return None;
        }
        let request = match self.form.request() {
            Ok(request) => request,
            Err(err) => {
                self.notify(NotificationLevel::Error, err.to_string());
                return None;
            }
        };
        tracing::info!(
            identity = %request.identity,
            achievement_id = ?request.achievement_id,
            "Lookup submitted"
        );
        let guard = self.lookups.begin();
        Some(Effect::Lookup { request, guard })
    }

    /// Start loading realms for the form's region unless a fresh list is
    /// already known.
    pub fn begin_realm_load(&mut self) -> Option<Effect> {
        let region = self.form.region;
        if self.realms.get(region, self.clock.now()).is_some() {
            return None;
        }
        let guard = self.realm_loads.begin();
        Some(Effect::LoadRealms { region, guard })
    }

    pub fn finish_realm_load(&mut self, outcome: RealmsOutcome) {
        let RealmsOutcome {
            region,
            result,
            guard,
        } = outcome;
        if !self.realm_loads.is_current(&guard) {
            tracing::debug!(region = %region, generation = guard.generation(), "Discarding superseded realm list");
            return;
        }
        match result {
            Ok(realms) => {
                tracing::debug!(region = %region, count = realms.len(), "Realm list loaded");
                self.realms.insert(region, realms, self.clock.now());
            }
            Err(err) => {
                tracing::warn!(region = %region, error = %err, "Realm list request failed");
                self.notify(
                    NotificationLevel::Warning,
                    format!("Realm list for {} unavailable: {}", region, err),
                );
            }
        }
    }

    pub fn finish_lookup(&mut self, outcome: LookupOutcome) {
        let LookupOutcome {
            request,
            result,
            guard,
        } = outcome;
        if !self.lookups.is_current(&guard) {
            tracing::info!(
                identity = %request.identity,
                generation = guard.generation(),
                "Discarding superseded lookup response"
            );
            return;
        }
        match result {
            Ok(tree) => self.show_tree(request, tree),
            Err(FetchError::NotFound(message)) => {
                self.results = ResultsView {
                    request: Some(request),
                    message: Some(message.clone()),
                    ..ResultsView::default()
                };
                self.notify(NotificationLevel::Warning, message);
            }
            Err(err @ FetchError::Transport(_)) => {
                let message = format!("Lookup failed: {}", err);
                self.results = ResultsView {
                    request: Some(request),
                    message: Some(message.clone()),
                    ..ResultsView::default()
                };
                self.notify(NotificationLevel::Error, message);
            }
        }
    }

    fn show_tree(&mut self, request: LookupRequest, tree: ProgressTree) {
        let scoped = match request.achievement_id {
            Some(id) => match reroot(&tree, id) {
                Some(scoped) => scoped,
                None => {
                    let message = format!(
                        "Achievement {} is not part of {}'s progress",
                        id,
                        request.identity.character()
                    );
                    self.results = ResultsView {
                        request: Some(request),
                        message: Some(message.clone()),
                        ..ResultsView::default()
                    };
                    self.notify(NotificationLevel::Warning, message);
                    return;
                }
            },
            None => ScopedTree::whole(tree),
        };

        let mut rendered = render_scoped(&scoped);
        set_filter(&mut rendered, self.hide_completed);
        let message = rendered
            .is_empty()
            .then(|| "No criteria recorded for this achievement".to_string());
        let loaded = format!("Loaded {} nodes for {}", rendered.len(), request.identity);
        self.results = ResultsView {
            source: Some(scoped.tree),
            tree: Some(rendered),
            request: Some(request),
            selected: 0,
            message,
        };
        self.focus = Focus::Results;
        self.notify(NotificationLevel::Success, loaded);
    }

    pub fn visible_rows(&self) -> Vec<usize> {
        self.results
            .tree
            .as_ref()
            .map(RenderedTree::visible_rows)
            .unwrap_or_default()
    }

    /// Arena index of the selected node.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible_rows().get(self.results.selected).copied()
    }

    pub fn selected_node(&self) -> Option<&RenderedNode> {
        let index = self.selected_index()?;
        self.results.tree.as_ref()?.node(index)
    }

    /// Progress summary for the selected node, when it is an achievement.
    pub fn selected_progress(&self) -> Option<AchievementProgress> {
        let id = self.selected_node()?.reference_id?;
        achievement_progress(self.results.source.as_ref()?, id)
    }

    pub fn select_next(&mut self) {
        let rows = self.visible_rows().len();
        if rows > 0 && self.results.selected + 1 < rows {
            self.results.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.results.selected = self.results.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let rows = self.visible_rows().len();
        self.results.selected = self.results.selected.min(rows.saturating_sub(1));
    }

    pub fn toggle_selected(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        if let Some(tree) = self.results.tree.as_mut() {
            tree.toggle_at(index);
        }
        self.clamp_selection();
    }

    pub fn toggle_hide_completed(&mut self) {
        self.hide_completed = !self.hide_completed;
        let summary = self
            .results
            .tree
            .as_mut()
            .map(|tree| set_filter(tree, self.hide_completed));
        self.clamp_selection();
        let message = match (self.hide_completed, summary) {
            (true, Some(summary)) => format!("Hiding {} completed nodes", summary.hidden),
            (true, None) => "Hiding completed nodes".to_string(),
            (false, _) => "Showing completed nodes".to_string(),
        };
        self.notify(NotificationLevel::Info, message);
    }

    fn export(&mut self) -> Option<Effect> {
        match self.results.tree.as_ref() {
            Some(tree) if !tree.is_empty() => {
                Some(Effect::Export(export_visible(tree, self.hide_completed)))
            }
            _ => {
                self.notify(NotificationLevel::Info, "Nothing to export yet");
                None
            }
        }
    }

    pub fn finish_export(&mut self, result: Result<ExportDelivery, ExportError>) {
        match result {
            Ok(ExportDelivery::Clipboard) => {
                self.notify(NotificationLevel::Success, "Visible progress copied to clipboard")
            }
            Ok(ExportDelivery::File(path)) => self.notify(
                NotificationLevel::Info,
                format!("Clipboard unavailable; saved to {}", path.display()),
            ),
            Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ApiClientError;
    use achv_core::{ParentInfo, Realm, StepNode};
    use achv_storage::ManualClock;
    use chrono::Utc;
    use std::path::PathBuf;

    fn config() -> TuiConfig {
        TuiConfig {
            api_base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 5_000,
            tick_rate_ms: 250,
            cache_path: PathBuf::from("tmp/cache.json"),
            state_path: PathBuf::from("tmp/state.json"),
            error_log_path: PathBuf::from("tmp/achv.log"),
            export_dir: PathBuf::from("tmp"),
            clipboard_command: Vec::new(),
            default_region: "eu".to_string(),
            theme: crate::config::ThemeConfig {
                name: "midnight".to_string(),
            },
        }
    }

    fn app() -> (App, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (App::with_clock(config(), clock.clone()), clock)
    }

    fn filled(app: &mut App) {
        app.form.realm = "Draenor".to_string();
        app.form.character = "Jaina".to_string();
    }

    fn tree() -> ProgressTree {
        ProgressTree {
            parent: ParentInfo {
                id: Some(500),
                name: "Root".to_string(),
                ..ParentInfo::default()
            },
            character: "jaina".to_string(),
            server: "draenor".to_string(),
            server_name: Some("Draenor".to_string()),
            steps: vec![
                StepNode::new(Some(1), "Done", true)
                    .with_children(vec![StepNode::new(Some(2), "Done child", false)]),
                StepNode::new(Some(3), "Open", false).with_children(vec![
                    StepNode::new(Some(4), "Open child", false),
                    StepNode::new(None, "Nameless", true),
                ]),
            ],
        }
    }

    fn submit(app: &mut App) -> (LookupRequest, InFlight) {
        match app.handle_action(Action::Submit) {
            Some(Effect::Lookup { request, guard }) => (request, guard),
            other => panic!("expected lookup, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_in_configured_region() {
        let (app, _) = app();
        assert_eq!(app.form.region, Region::Eu);
        assert_eq!(app.focus, Focus::Form);
    }

    #[test]
    fn test_typing_edits_focused_text_field_only() {
        let (mut app, _) = app();
        app.handle_action(Action::Input('x'));
        assert_eq!(app.form.region, Region::Eu);

        app.handle_action(Action::NextField);
        for c in "stormrage".chars() {
            app.handle_action(Action::Input(c));
        }
        app.handle_action(Action::Backspace);
        assert_eq!(app.form.realm, "stormrag");
    }

    #[test]
    fn test_submit_requires_identity() {
        let (mut app, _) = app();
        assert!(app.handle_action(Action::Submit).is_none());
        assert_eq!(app.notifications.last().unwrap().level, NotificationLevel::Error);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_submit_rejects_non_numeric_achievement() {
        let (mut app, _) = app();
        filled(&mut app);
        app.form.achievement = "19458a".to_string();
        assert!(app.handle_action(Action::Submit).is_none());
    }

    #[test]
    fn test_submit_locks_until_guard_released() {
        let (mut app, _) = app();
        filled(&mut app);
        let (request, guard) = submit(&mut app);
        assert_eq!(request.identity.to_string(), "eu/draenor/jaina");
        assert!(app.is_loading());
        assert!(app.handle_action(Action::Submit).is_none());

        app.finish_lookup(LookupOutcome {
            request,
            result: Err(FetchError::Transport(ApiClientError::InvalidResponse(
                "boom".to_string(),
            ))),
            guard,
        });
        assert!(!app.is_loading());
        assert!(app.handle_action(Action::Submit).is_some());
    }

    #[test]
    fn test_successful_lookup_renders_and_focuses_results() {
        let (mut app, _) = app();
        filled(&mut app);
        let (request, guard) = submit(&mut app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Ok(tree()),
            guard,
        });

        assert_eq!(app.focus, Focus::Results);
        let rendered = app.results.tree.as_ref().unwrap();
        assert_eq!(rendered.len(), 5);
        assert_eq!(
            rendered.title.as_ref().unwrap().display_name(),
            "Root (jaina-Draenor)"
        );
        assert_eq!(app.visible_rows().len(), 2);
        assert_eq!(app.selected_node().unwrap().name, "Done");
    }

    #[test]
    fn test_superseded_lookup_is_discarded() {
        let (mut app, _) = app();
        filled(&mut app);
        let request = app.form.request().unwrap();
        let stale = app.lookups.begin();
        let _current = app.lookups.begin();

        app.finish_lookup(LookupOutcome {
            request,
            result: Ok(tree()),
            guard: stale,
        });
        assert!(app.results.tree.is_none());
        assert!(app.is_loading());
    }

    #[test]
    fn test_transport_failure_replaces_previous_results() {
        let (mut app, _) = app();
        loaded(&mut app);
        assert!(app.results.tree.is_some());

        app.form.character = "Thrall".to_string();
        let (request, guard) = submit(&mut app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Err(FetchError::Transport(ApiClientError::Status {
                status: 502,
                message: "bad gateway".to_string(),
            })),
            guard,
        });

        assert!(app.results.tree.is_none());
        assert!(app.results.source.is_none());
        assert_eq!(
            app.results.request.as_ref().unwrap().identity.to_string(),
            "eu/draenor/thrall"
        );
        assert!(app
            .results
            .message
            .as_deref()
            .unwrap()
            .starts_with("Lookup failed"));
        assert!(app.handle_action(Action::Export).is_none());
    }

    #[test]
    fn test_not_found_is_inline_message() {
        let (mut app, _) = app();
        filled(&mut app);
        let (request, guard) = submit(&mut app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Err(FetchError::NotFound("Character not found".to_string())),
            guard,
        });
        assert!(app.results.tree.is_none());
        assert_eq!(app.results.message.as_deref(), Some("Character not found"));
    }

    #[test]
    fn test_achievement_id_reroots_view() {
        let (mut app, _) = app();
        filled(&mut app);
        app.form.achievement = "3".to_string();
        let (request, guard) = submit(&mut app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Ok(tree()),
            guard,
        });
        let rendered = app.results.tree.as_ref().unwrap();
        assert_eq!(rendered.title.as_ref().unwrap().name, "Open");
        assert_eq!(rendered.len(), 2);
    }

    #[test]
    fn test_scoping_to_done_achievement_keeps_criteria_done() {
        let (mut app, _) = app();
        filled(&mut app);
        app.form.achievement = "1".to_string();
        let (request, guard) = submit(&mut app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Ok(tree()),
            guard,
        });

        let rendered = app.results.tree.as_ref().unwrap();
        assert!(rendered.title.as_ref().unwrap().done);
        assert_eq!(rendered.nodes()[0].name, "Done child");
        assert!(rendered.nodes()[0].effective_done);

        let Some(Effect::Export(markdown)) = app.handle_action(Action::Export) else {
            panic!("expected export");
        };
        assert!(markdown.contains("- [x] Done child"));
    }

    #[test]
    fn test_unknown_achievement_id_is_lookup_miss() {
        let (mut app, _) = app();
        filled(&mut app);
        app.form.achievement = "999".to_string();
        let (request, guard) = submit(&mut app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Ok(tree()),
            guard,
        });
        assert!(app.results.tree.is_none());
        assert!(app.results.message.as_deref().unwrap().contains("999"));
    }

    fn loaded(app: &mut App) {
        filled(app);
        let (request, guard) = submit(app);
        app.finish_lookup(LookupOutcome {
            request,
            result: Ok(tree()),
            guard,
        });
    }

    #[test]
    fn test_toggle_and_navigate() {
        let (mut app, _) = app();
        loaded(&mut app);

        app.handle_action(Action::MoveDown);
        assert_eq!(app.selected_node().unwrap().name, "Open");
        app.handle_action(Action::ToggleNode);
        assert_eq!(app.visible_rows().len(), 4);

        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        assert_eq!(app.selected_node().unwrap().name, "Nameless");
        app.handle_action(Action::MoveUp);
        assert_eq!(app.selected_node().unwrap().name, "Open child");
    }

    #[test]
    fn test_hide_completed_clamps_selection() {
        let (mut app, _) = app();
        loaded(&mut app);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::ToggleNode);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);

        app.handle_action(Action::ToggleCompleted);
        assert!(app.hide_completed);
        let names: Vec<_> = app
            .visible_rows()
            .into_iter()
            .map(|i| app.results.tree.as_ref().unwrap().nodes()[i].name.clone())
            .collect();
        assert_eq!(names, ["Open", "Open child"]);
        assert_eq!(app.selected_node().unwrap().name, "Open child");
    }

    #[test]
    fn test_export_follows_filter() {
        let (mut app, _) = app();
        loaded(&mut app);
        let Some(Effect::Export(all)) = app.handle_action(Action::Export) else {
            panic!("expected export");
        };
        assert_eq!(all.matches("- [").count(), 5);

        app.handle_action(Action::ToggleCompleted);
        let Some(Effect::Export(open)) = app.handle_action(Action::Export) else {
            panic!("expected export");
        };
        assert_eq!(open.matches("- [").count(), 2);
        assert!(!open.contains("[x]"));
    }

    #[test]
    fn test_export_without_results_is_a_notice() {
        let (mut app, _) = app();
        assert!(app.handle_action(Action::Export).is_none());
    }

    #[test]
    fn test_region_cycle_requests_realms_once_fresh() {
        let (mut app, clock) = app();
        let Some(Effect::LoadRealms { region, guard }) = app.handle_action(Action::CycleNext)
        else {
            panic!("expected realm load");
        };
        assert_eq!(region, Region::Kr);

        app.finish_realm_load(RealmsOutcome {
            region,
            result: Ok(vec![Realm {
                name: "Azshara".to_string(),
                slug: "azshara".to_string(),
            }]),
            guard,
        });
        assert!(app.begin_realm_load().is_none());

        app.form.focused = FormField::Realm;
        assert!(app.handle_action(Action::CycleNext).is_none());
        assert_eq!(app.form.realm, "azshara");

        clock.advance(crate::realms::REALM_TTL);
        assert!(app.begin_realm_load().is_some());
    }

    #[test]
    fn test_superseded_realm_list_is_dropped() {
        let (mut app, _) = app();
        let stale = app.realm_loads.begin();
        let _current = app.realm_loads.begin();
        app.finish_realm_load(RealmsOutcome {
            region: Region::Eu,
            result: Ok(Vec::new()),
            guard: stale,
        });
        assert!(app.realms.get(Region::Eu, Utc::now()).is_none());
    }

    #[test]
    fn test_achievement_field_cycles_suggestions() {
        let (mut app, _) = app();
        app.form.focused = FormField::Achievement;
        app.handle_action(Action::CycleNext);
        assert_eq!(app.form.achievement, "19458");
        assert!(app.form.suggestion_name().unwrap().starts_with("A World Awoken"));
        app.handle_action(Action::CyclePrev);
        assert_eq!(app.form.achievement, "40953");
        app.handle_action(Action::CyclePrev);
        assert_eq!(app.form.achievement, "20501");
    }

    #[test]
    fn test_toggle_form_moves_focus() {
        let (mut app, _) = app();
        app.handle_action(Action::ToggleForm);
        assert!(!app.form_visible);
        assert_eq!(app.focus, Focus::Results);
        app.handle_action(Action::SwitchFocus);
        assert!(app.form_visible);
        assert_eq!(app.focus, Focus::Form);
    }

    #[test]
    fn test_persisted_state_round_trip() {
        let (mut app, _) = app();
        app.restore(&PersistedState {
            region: Region::Tw,
            realm: "Zealot Blade".to_string(),
            character: "Li".to_string(),
        });
        let state = app.persisted_state();
        assert_eq!(state.region, Region::Tw);
        assert_eq!(state.realm, "Zealot Blade");
        assert_eq!(state.character, "Li");
    }

    #[test]
    fn test_notifications_expire() {
        let (mut app, clock) = app();
        app.notify(NotificationLevel::Info, "hello");
        clock.advance(crate::notifications::NOTIFICATION_TTL - std::time::Duration::from_secs(1));
        app.prune_notifications();
        assert_eq!(app.notifications.len(), 1);
        clock.advance(std::time::Duration::from_secs(1));
        app.prune_notifications();
        assert!(app.notifications.is_empty());
    }
}
