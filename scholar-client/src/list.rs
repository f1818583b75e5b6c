//! Render decisions for resource lists.

use crate::query::{QueryState, QueryStatus};

/// What a list view should draw for the current [`QueryState`].
#[derive(Debug, PartialEq)]
pub enum ListRender<'a, T> {
    Loading,
    Failed { message: String, retryable: bool },
    Empty { message: &'a str },
    Items(&'a [T]),
}

pub fn render_decision<'a, T>(state: &'a QueryState<Vec<T>>, empty_message: &'a str) -> ListRender<'a, T> {
    match state.status {
        QueryStatus::Idle | QueryStatus::Loading => ListRender::Loading,
        QueryStatus::Error => {
            let (message, retryable) = state
                .error
                .as_ref()
                .map(|e| (e.message.clone(), e.retryable()))
                .unwrap_or_else(|| ("Something went wrong".to_string(), true));
            ListRender::Failed { message, retryable }
        }
        QueryStatus::Success => match state.data() {
            Some(items) if !items.is_empty() => ListRender::Items(items),
            _ => ListRender::Empty {
                message: empty_message,
            },
        },
    }
}

/// Row-level actions a list can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    View,
    Edit,
    Delete,
    /// Resource-specific action (approve an activity, complete an
    /// intervention, assign students).
    Secondary,
}

type Callback<Id> = Box<dyn Fn(&Id) + Send + Sync>;

/// Parent-supplied handlers. Lists never act on rows themselves.
pub struct RowActions<Id> {
    on_view: Option<Callback<Id>>,
    on_edit: Option<Callback<Id>>,
    on_delete: Option<Callback<Id>>,
    on_secondary: Option<Callback<Id>>,
}

impl<Id> Default for RowActions<Id> {
    fn default() -> Self {
        Self {
            on_view: None,
            on_edit: None,
            on_delete: None,
            on_secondary: None,
        }
    }
}

impl<Id> RowActions<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_view(mut self, f: impl Fn(&Id) + Send + Sync + 'static) -> Self {
        self.on_view = Some(Box::new(f));
        self
    }

    pub fn on_edit(mut self, f: impl Fn(&Id) + Send + Sync + 'static) -> Self {
        self.on_edit = Some(Box::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl Fn(&Id) + Send + Sync + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_secondary(mut self, f: impl Fn(&Id) + Send + Sync + 'static) -> Self {
        self.on_secondary = Some(Box::new(f));
        self
    }

    pub fn supports(&self, action: RowAction) -> bool {
        self.handler(action).is_some()
    }

    /// Invoke the handler for `action`. Returns `false` if none is set.
    pub fn dispatch(&self, action: RowAction, id: &Id) -> bool {
        match self.handler(action) {
            Some(handler) => {
                handler(id);
                true
            }
            None => false,
        }
    }

    fn handler(&self, action: RowAction) -> Option<&Callback<Id>> {
        match action {
            RowAction::View => self.on_view.as_ref(),
            RowAction::Edit => self.on_edit.as_ref(),
            RowAction::Delete => self.on_delete.as_ref(),
            RowAction::Secondary => self.on_secondary.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, QueryError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn state(status: QueryStatus, data: Option<Vec<u8>>) -> QueryState<Vec<u8>> {
        QueryState {
            status,
            data: data.map(Arc::new),
            error: (status == QueryStatus::Error)
                .then(|| QueryError::new(ErrorKind::Transport, "Could not reach the server")),
            fetched_at: None,
            stale: false,
        }
    }

    #[test]
    fn decision_follows_status() {
        assert_eq!(render_decision(&state(QueryStatus::Idle, None), "none"), ListRender::Loading);
        assert_eq!(
            render_decision(&state(QueryStatus::Loading, Some(vec![1])), "none"),
            ListRender::Loading
        );
        assert_eq!(
            render_decision(&state(QueryStatus::Error, Some(vec![1])), "none"),
            ListRender::Failed {
                message: "Could not reach the server".into(),
                retryable: true
            }
        );
        assert_eq!(
            render_decision(&state(QueryStatus::Success, Some(vec![])), "No students yet"),
            ListRender::Empty {
                message: "No students yet"
            }
        );
        let full = state(QueryStatus::Success, Some(vec![4, 5]));
        assert_eq!(render_decision(&full, "none"), ListRender::Items(&[4u8, 5][..]));
    }

    #[test]
    fn actions_are_delegated() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let actions = RowActions::<u32>::new().on_delete(move |id| {
            counter.fetch_add(*id as usize, Ordering::SeqCst);
        });
        assert!(actions.dispatch(RowAction::Delete, &3));
        assert!(!actions.dispatch(RowAction::Edit, &3));
        assert!(!actions.supports(RowAction::Secondary));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
