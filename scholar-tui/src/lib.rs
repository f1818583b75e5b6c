//! Scholar terminal dashboard library exports.

pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod keys;
pub mod login;
pub mod nav;
pub mod notifications;
pub mod page;
pub mod persistence;
pub mod state;
pub mod telemetry;
pub mod theme;
pub mod views;
pub mod widgets;
