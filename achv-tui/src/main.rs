//! achv TUI entry point.

use achv_storage::{CacheStore, JsonFileCacheBackend};
use achv_tui::api_client::RestClient;
use achv_tui::config::TuiConfig;
use achv_tui::error::TuiError;
use achv_tui::events::{LookupOutcome, RealmsOutcome, TuiEvent};
use achv_tui::export::ExportSink;
use achv_tui::fetcher::ProgressFetcher;
use achv_tui::keys::map_key;
use achv_tui::persistence;
use achv_tui::state::{App, Effect};
use achv_tui::views::render_app;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "ACHV_LOG";

type Fetcher = ProgressFetcher<JsonFileCacheBackend>;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_tracing(&config)?;
    tracing::info!(api_base_url = %config.api_base_url, "Starting achv");

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let rest = Arc::new(RestClient::new(&config)?);
    let cache = CacheStore::new(JsonFileCacheBackend::new(&config.cache_path));
    let runtime = Runtime {
        fetcher: Arc::new(ProgressFetcher::new(rest, cache)),
        exporter: ExportSink::new(config.clipboard_command.clone(), &config.export_dir),
        events: event_tx.clone(),
    };

    let mut app = App::new(config);
    match persistence::load(&app.config.state_path) {
        Ok(Some(state)) => app.restore(&state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable state file"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    spawn_input_reader(event_tx);

    if let Some(effect) = app.begin_realm_load() {
        runtime.perform(&app, effect);
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(app.config.tick_rate_ms));

    loop {
        terminal.draw(|f| render_app(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => app.on_tick(),
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, &runtime, event) {
                    break;
                }
            }
        }
    }

    save_state(&app);
    tracing::info!("Exiting achv");
    Ok(())
}

fn init_tracing(config: &TuiConfig) -> Result<(), TuiError> {
    if let Some(parent) = config.error_log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.error_log_path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Carries out the effects the app asks for.
struct Runtime {
    fetcher: Arc<Fetcher>,
    exporter: ExportSink,
    events: mpsc::Sender<TuiEvent>,
}

impl Runtime {
    /// Returns true when the app should exit.
    fn perform(&self, app: &App, effect: Effect) -> bool {
        let events = self.events.clone();
        match effect {
            Effect::Quit => return true,
            Effect::Lookup { request, guard } => {
                save_state(app);
                let fetcher = Arc::clone(&self.fetcher);
                tokio::spawn(async move {
                    let result = fetcher.fetch(&request.identity).await;
                    let outcome = LookupOutcome {
                        request,
                        result,
                        guard,
                    };
                    let _ = events
                        .send(TuiEvent::LookupFinished(Box::new(outcome)))
                        .await;
                });
            }
            Effect::LoadRealms { region, guard } => {
                let backend = Arc::clone(self.fetcher.backend());
                tokio::spawn(async move {
                    let result = backend.realms(region).await;
                    let outcome = RealmsOutcome {
                        region,
                        result,
                        guard,
                    };
                    let _ = events.send(TuiEvent::RealmsLoaded(outcome)).await;
                });
            }
            Effect::Export(markdown) => {
                let exporter = self.exporter.clone();
                tokio::spawn(async move {
                    let result = exporter.deliver(&markdown).await;
                    let _ = events.send(TuiEvent::ExportFinished(result)).await;
                });
            }
        }
        false
    }
}

fn handle_event(app: &mut App, runtime: &Runtime, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(effect) = map_key(key, app.focus).and_then(|a| app.handle_action(a)) {
                return runtime.perform(app, effect);
            }
        }
        TuiEvent::LookupFinished(outcome) => app.finish_lookup(*outcome),
        TuiEvent::RealmsLoaded(outcome) => app.finish_realm_load(outcome),
        TuiEvent::ExportFinished(result) => app.finish_export(result),
        TuiEvent::Resize { .. } => {}
    }
    false
}

fn save_state(app: &App) {
    if let Err(err) = persistence::save(&app.config.state_path, &app.persisted_state()) {
        tracing::warn!(error = %err, path = %app.config.state_path.display(), "Failed to save form state");
    }
}
