//! Snapshot of a cached query.

use crate::error::QueryError;
use scholar_core::Timestamp;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// What a page sees when it reads a key.
///
/// `data` survives invalidation and refetches so callers that want to keep
/// showing the previous result can use [`QueryState::last_data`], but only
/// [`QueryState::data`] is trustworthy: it is `Some` only on `Success`.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<QueryError>,
    pub fetched_at: Option<Timestamp>,
    /// Invalidated since the last successful fetch.
    pub stale: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetched_at: None,
            stale: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Idle | QueryStatus::Loading)
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn data(&self) -> Option<&T> {
        match self.status {
            QueryStatus::Success => self.data.as_deref(),
            _ => None,
        }
    }

    /// Most recent successful payload, whatever the current status.
    pub fn last_data(&self) -> Option<&T> {
        self.data.as_deref()
    }
}

impl<T> QueryState<Vec<T>> {
    /// The only "empty" signal: a successful fetch that returned no rows.
    pub fn is_empty_success(&self) -> bool {
        self.data().is_some_and(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn data_is_only_trusted_on_success() {
        let mut state = QueryState {
            status: QueryStatus::Loading,
            data: Some(Arc::new(vec![1, 2])),
            error: None,
            fetched_at: None,
            stale: true,
        };
        assert!(state.data().is_none());
        assert_eq!(state.last_data(), Some(&vec![1, 2]));

        state.status = QueryStatus::Error;
        state.error = Some(QueryError::new(ErrorKind::Server, "boom"));
        assert!(state.data().is_none());

        state.status = QueryStatus::Success;
        assert_eq!(state.data(), Some(&vec![1, 2]));
    }

    #[test]
    fn empty_requires_success() {
        let idle: QueryState<Vec<u8>> = QueryState::idle();
        assert!(!idle.is_empty_success());
        let done = QueryState {
            status: QueryStatus::Success,
            data: Some(Arc::new(Vec::<u8>::new())),
            error: None,
            fetched_at: None,
            stale: false,
        };
        assert!(done.is_empty_success());
    }
}
