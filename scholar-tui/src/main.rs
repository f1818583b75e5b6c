//! Scholar dashboard entry point.

use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use scholar_client::{ApiClient, FileStore, QueryCache, SessionService};
use scholar_tui::config::TuiConfig;
use scholar_tui::error::TuiError;
use scholar_tui::events::TuiEvent;
use scholar_tui::notifications::NotificationLevel;
use scholar_tui::persistence::{self, PersistedState};
use scholar_tui::state::App;
use scholar_tui::telemetry;
use scholar_tui::views::render_view;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = TuiConfig::load().wrap_err("failed to load configuration")?;
    telemetry::init(&config.log_path, config.log_format)
        .map_err(|err| TuiError::Telemetry(err.to_string()))?;
    tracing::info!(api = %config.client.api_base_url, "starting scholar dashboard");

    let session = SessionService::from_file(&config.client.session_path);
    let api = ApiClient::new(&config.client, session).map_err(TuiError::from)?;
    let cache = QueryCache::new();
    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    let ui_store = FileStore::new(&config.persistence_path);
    let mut app = App::new(config, api, cache, event_tx.clone());
    match persistence::load(&ui_store) {
        Ok(Some(state)) => app.switch_view(state.active_view),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable UI state"),
    }
    if app.session.is_authenticated() {
        verify_session(&app);
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    spawn_input_reader(event_tx.clone());

    let mut session_rx = app.session.subscribe();
    let mut cache_rx = app.cache.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_millis(app.config.refresh_interval_ms));

    loop {
        terminal.draw(|f| render_view(f, &mut app))?;

        tokio::select! {
            _ = ticker.tick() => app.handle_event(TuiEvent::Tick),
            Some(event) = event_rx.recv() => app.handle_event(event),
            Ok(()) = session_rx.changed() => {
                let current = session_rx.borrow_and_update().clone();
                app.on_session_changed(current);
            }
            // Any cache change is a reason to redraw.
            Ok(()) = cache_rx.changed() => {}
        }

        if app.should_quit {
            break;
        }
    }

    let persisted = PersistedState {
        active_view: app.active_view,
    };
    if let Err(err) = persistence::save(&ui_store, &persisted) {
        tracing::warn!(error = %err, "failed to save UI state");
    }
    tracing::info!("scholar dashboard stopped");
    Ok(())
}

/// A stored token may have expired; a 401 from `/auth/me` clears it and
/// the session watch brings up the login screen.
fn verify_session(app: &App) {
    let api = app.api.clone();
    let events = app.events();
    tokio::spawn(async move {
        if let Err(err) = api.me().await {
            tracing::info!(error = %err, "stored session rejected");
            let _ = events
                .send(TuiEvent::Notify(NotificationLevel::Warning, err.user_message()))
                .await;
        }
    });
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
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
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
