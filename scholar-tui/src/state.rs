//! Application state for the Scholar dashboard.

use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::keys::{map_key, map_text_key, Action};
use crate::login::LoginForm;
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel, Notifications};
use crate::page::{build_pages, Pages};
use crate::theme::ScholarTheme;
use chrono::{Duration, Utc};
use crossterm::event::KeyEvent;
use scholar_client::{ApiClient, QueryCache, Session, SessionService};
use scholar_core::Role;
use tokio::sync::mpsc;

const NOTIFICATION_TTL_SECS: i64 = 5;

pub struct App {
    pub config: TuiConfig,
    pub theme: ScholarTheme,
    pub api: ApiClient,
    pub cache: QueryCache,
    pub session: SessionService,
    pub active_view: View,
    pub pages: Pages,
    pub login: LoginForm,
    pub notifications: Notifications,
    pub show_help: bool,
    pub should_quit: bool,
    signed_in: bool,
    events: mpsc::Sender<TuiEvent>,
}

impl App {
    pub fn new(config: TuiConfig, api: ApiClient, cache: QueryCache, events: mpsc::Sender<TuiEvent>) -> Self {
        let session = api.session().clone();
        let pages = build_pages(&api, &cache, &events);
        let signed_in = session.is_authenticated();
        Self {
            config,
            theme: ScholarTheme::scholar(),
            api,
            cache,
            session,
            active_view: View::Dashboard,
            pages,
            login: LoginForm::new(),
            notifications: Notifications::new(Duration::seconds(NOTIFICATION_TTL_SECS)),
            show_help: false,
            should_quit: false,
            signed_in,
            events,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn role(&self) -> Option<Role> {
        self.session.get().map(|session| session.user.role)
    }

    /// Views the signed-in account may open, in navigation order.
    pub fn visible_views(&self) -> Vec<View> {
        let teacher = self.role() == Some(Role::Teacher);
        View::all()
            .iter()
            .copied()
            .filter(|view| !teacher || view.visible_to_teacher())
            .collect()
    }

    pub fn switch_view(&mut self, view: View) {
        if !self.visible_views().contains(&view) {
            return;
        }
        self.active_view = view;
        self.show_help = false;
    }

    fn step_view(&mut self, forward: bool) {
        let visible = self.visible_views();
        let mut view = self.active_view;
        for _ in 0..View::all().len() {
            view = if forward { view.next() } else { view.previous() };
            if visible.contains(&view) {
                break;
            }
        }
        self.switch_view(view);
    }

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Input(key) => self.handle_key(key),
            TuiEvent::Tick => {
                self.notifications.prune(Utc::now());
            }
            TuiEvent::Resize { width, height } => {
                tracing::trace!(width, height, "terminal resized");
            }
            TuiEvent::Submitted { view, epoch, result } => {
                if let Some(page) = self.pages.get_mut(&view) {
                    page.on_submitted(epoch, result);
                }
            }
            TuiEvent::LoginFinished(result) => {
                if let Err(message) = &result {
                    tracing::info!(error = %message, "sign-in failed");
                }
                self.login.finish(result);
            }
            TuiEvent::Notify(level, message) => self.notify(level, message),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if !self.session.is_authenticated() {
            if let Some(text) = map_text_key(key) {
                if self.login.handle_text(text, &self.api, &self.events) {
                    self.should_quit = true;
                }
            }
            return;
        }

        let captures = self
            .pages
            .get(&self.active_view)
            .is_some_and(|page| page.captures_text());
        if captures {
            if let (Some(text), Some(page)) = (map_text_key(key), self.pages.get_mut(&self.active_view)) {
                page.handle_text(text);
            }
            return;
        }

        let Some(action) = map_key(key) else {
            return;
        };
        if self.show_help {
            if matches!(action, Action::OpenHelp | Action::Cancel | Action::Quit) {
                self.show_help = false;
            }
            return;
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextView => self.step_view(true),
            Action::PrevView => self.step_view(false),
            Action::SwitchView(index) => {
                if let Some(view) = View::from_index(index) {
                    self.switch_view(view);
                }
            }
            Action::OpenHelp => self.show_help = true,
            Action::Logout => self.logout(),
            other => {
                if let Some(page) = self.pages.get_mut(&self.active_view) {
                    page.handle(other);
                }
            }
        }
    }

    fn logout(&mut self) {
        let api = self.api.clone();
        tokio::spawn(async move {
            // The session is cleared even when the server call fails.
            if let Err(err) = api.logout().await {
                tracing::warn!(error = %err, "logout request failed");
            }
        });
    }

    /// React to the session watch. Sign-out from any source drops every
    /// cached query and resets page state before the login screen shows.
    pub fn on_session_changed(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                if !self.signed_in {
                    self.signed_in = true;
                    self.login = LoginForm::new();
                    if !self.visible_views().contains(&self.active_view) {
                        self.active_view = View::Dashboard;
                    }
                    tracing::info!(role = %session.user.role, "signed in");
                    self.notify(
                        NotificationLevel::Success,
                        format!("Signed in as {}", session.user.display_name()),
                    );
                }
            }
            None => {
                if self.signed_in {
                    self.signed_in = false;
                    self.cache.clear();
                    self.pages = build_pages(&self.api, &self.cache, &self.events);
                    self.show_help = false;
                    tracing::info!("signed out");
                    self.notify(NotificationLevel::Info, "Signed out");
                }
            }
        }
    }

    /// Sender for background tasks that report back to the event loop.
    pub fn events(&self) -> mpsc::Sender<TuiEvent> {
        self.events.clone()
    }
}
