//! Event types for the TUI event loop.

use crate::nav::View;
use crate::notifications::NotificationLevel;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// A form submission spawned by `view` settled.
    Submitted {
        view: View,
        epoch: u64,
        result: Result<(), String>,
    },
    /// A login attempt settled. The session watch handles success.
    LoginFinished(Result<(), String>),
    Notify(NotificationLevel, String),
}
