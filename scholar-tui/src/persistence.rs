//! UI state kept between runs.
//!
//! Stored as one JSON entry in a [`KeyValueStore`], the same storage the
//! client keeps its session in.

use crate::nav::View;
use scholar_client::{KeyValueStore, SessionError};
use serde::{Deserialize, Serialize};

pub const UI_STATE_KEY: &str = "scholar.ui";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub active_view: View,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Store(#[from] SessionError),
    #[error("Unreadable UI state: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub fn load(store: &dyn KeyValueStore) -> Result<Option<PersistedState>, PersistenceError> {
    match store.get(UI_STATE_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save(store: &dyn KeyValueStore, state: &PersistedState) -> Result<(), PersistenceError> {
    store.set(UI_STATE_KEY, &serde_json::to_string(state)?)?;
    Ok(())
}
