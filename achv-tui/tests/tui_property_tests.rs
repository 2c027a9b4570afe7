use achv_core::{
    export_visible, render_progress, set_filter, Identity, LookupPayload, ProgressTree, Realm,
    Region,
};
use achv_storage::{CacheStore, JsonFileCacheBackend};
use achv_test_utils::fixtures;
use achv_test_utils::generators::arb_progress_tree;
use achv_tui::api_client::{ApiClientError, ProgressBackend};
use achv_tui::config::{ThemeConfig, TuiConfig};
use achv_tui::events::LookupOutcome;
use achv_tui::fetcher::ProgressFetcher;
use achv_tui::keys::{map_key, Action};
use achv_tui::state::{App, Effect, Focus};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:8080".to_string(),
        request_timeout_ms: 5_000,
        tick_rate_ms: 250,
        cache_path: "tmp/achv-cache.json".into(),
        state_path: "tmp/achv-state.json".into(),
        error_log_path: "tmp/achv.log".into(),
        export_dir: "tmp".into(),
        clipboard_command: Vec::new(),
        default_region: "us".to_string(),
        theme: ThemeConfig {
            name: "midnight".to_string(),
        },
    }
}

fn loaded_app(tree: ProgressTree) -> App {
    let mut app = App::new(base_config());
    app.form.realm = "area-52".to_string();
    app.form.character = "thrall".to_string();
    let Some(Effect::Lookup { request, guard }) = app.handle_action(Action::Submit) else {
        panic!("submit should start a lookup");
    };
    app.finish_lookup(LookupOutcome {
        request,
        result: Ok(tree),
        guard,
    });
    app
}

fn arb_results_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::MoveUp),
        Just(Action::MoveDown),
        Just(Action::ToggleNode),
        Just(Action::ToggleCompleted),
    ]
}

/// Counts lookups and always answers with the same tree.
struct FixedBackend {
    tree: ProgressTree,
    calls: AtomicUsize,
}

#[async_trait]
impl ProgressBackend for FixedBackend {
    async fn lookup(&self, _identity: &Identity) -> Result<LookupPayload, ApiClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LookupPayload::Tree(self.tree.clone()))
    }

    async fn realms(&self, _region: Region) -> Result<Vec<Realm>, ApiClientError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn file_cache_serves_second_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let backend = Arc::new(FixedBackend {
        tree: fixtures::sample_tree(),
        calls: AtomicUsize::new(0),
    });

    let first = ProgressFetcher::new(
        backend.clone(),
        CacheStore::new(JsonFileCacheBackend::new(&path)),
    );
    first.fetch(&fixtures::identity()).await.unwrap();

    let second = ProgressFetcher::new(
        backend.clone(),
        CacheStore::new(JsonFileCacheBackend::new(&path)),
    );
    let tree = second.fetch(&fixtures::identity()).await.unwrap();

    assert_eq!(tree, fixtures::sample_tree());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn sample_tree_loads_collapsed() {
    let app = loaded_app(fixtures::sample_tree());
    assert_eq!(app.focus, Focus::Results);
    assert_eq!(app.visible_rows().len(), 3);
    let progress = app.selected_progress().unwrap();
    assert_eq!(progress.name, "Explorer");
    assert_eq!(progress.completed_criteria(), 1);
    assert_eq!(progress.progress.len(), 2);
}

proptest! {
    #[test]
    fn printable_keys_type_into_the_form(c in proptest::char::range('!', '~')) {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        prop_assert_eq!(map_key(key, Focus::Form), Some(Action::Input(c)));
    }

    #[test]
    fn selection_stays_in_bounds(
        tree in arb_progress_tree(),
        actions in proptest::collection::vec(arb_results_action(), 0..40),
    ) {
        let mut app = loaded_app(tree);
        for action in actions {
            prop_assert!(app.handle_action(action).is_none());
            let rows = app.visible_rows().len();
            if rows == 0 {
                prop_assert!(app.selected_node().is_none());
            } else {
                prop_assert!(app.results.selected < rows);
                prop_assert!(app.selected_node().is_some());
            }
        }
    }

    #[test]
    fn app_export_matches_core_export(tree in arb_progress_tree(), hide in any::<bool>()) {
        let mut app = loaded_app(tree.clone());
        if hide {
            app.handle_action(Action::ToggleCompleted);
        }
        let from_app = match app.handle_action(Action::Export) {
            Some(Effect::Export(markdown)) => Some(markdown),
            _ => None,
        };

        let mut rendered = render_progress(&tree);
        set_filter(&mut rendered, hide);
        let expected = (!rendered.is_empty()).then(|| export_visible(&rendered, hide));
        prop_assert_eq!(from_app, expected);
    }

    #[test]
    fn hide_completed_twice_restores_rows(tree in arb_progress_tree()) {
        let mut app = loaded_app(tree);
        let before = app.visible_rows();
        app.handle_action(Action::ToggleCompleted);
        app.handle_action(Action::ToggleCompleted);
        prop_assert_eq!(app.visible_rows(), before);
    }
}
