//! Sign-in screen state.

use crate::events::TuiEvent;
use crate::input::{InputOutcome, TextFields};
use crate::keys::TextKey;
use scholar_client::ApiClient;
use scholar_core::LoginRequest;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub(crate) inputs: TextFields,
    pub(crate) error: Option<String>,
    pub(crate) pending: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            inputs: TextFields::new()
                .with_field("email", "Email", "")
                .with_secret("password", "Password"),
            error: None,
            pending: false,
        }
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns `true` when the user asked to quit from the login screen.
    pub fn handle_text(&mut self, key: TextKey, api: &ApiClient, events: &mpsc::Sender<TuiEvent>) -> bool {
        if self.pending {
            return false;
        }
        match self.inputs.apply(key) {
            InputOutcome::Editing => {
                self.error = None;
                false
            }
            InputOutcome::Cancel => true,
            InputOutcome::Submit => {
                self.submit(api, events);
                false
            }
        }
    }

    fn submit(&mut self, api: &ApiClient, events: &mpsc::Sender<TuiEvent>) {
        let request = match self.request() {
            Ok(request) => request,
            Err(message) => {
                self.error = Some(message);
                return;
            }
        };
        self.pending = true;
        self.error = None;

        let api = api.clone();
        let events = events.clone();
        tokio::spawn(async move {
            let result = api
                .login(&request)
                .await
                .map(|_| ())
                .map_err(|err| err.user_message());
            let _ = events.send(TuiEvent::LoginFinished(result)).await;
        });
    }

    fn request(&self) -> Result<LoginRequest, String> {
        let email = self.inputs.value("email").unwrap_or_default().trim();
        let password = self.inputs.value("password").unwrap_or_default();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Apply a settled login attempt. Success is handled by the session
    /// watch, which swaps the screen.
    pub fn finish(&mut self, result: Result<(), String>) {
        self.pending = false;
        match result {
            Ok(()) => *self = Self::default(),
            Err(message) => self.error = Some(message),
        }
    }
}
