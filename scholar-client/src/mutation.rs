//! Remote writes with tracked state and cache invalidation.

use crate::error::ApiClientError;
use crate::query::{QueryCache, QueryKey};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Terminal until [`Mutation::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MutationState {
    pub status: MutationStatus,
    pub error: Option<String>,
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// The write failed; `message` is what the user should see.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ApiClientError,
    },
    #[error("A previous request is still pending")]
    AlreadyPending,
}

impl MutationError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                source: ApiClientError::Unauthorized,
                ..
            }
        )
    }
}

/// User-facing message for a failed write: the server's message for
/// validation errors, otherwise `Failed to <verb> <resource>`.
pub fn failure_message(err: &ApiClientError, verb: &str, resource: &str) -> String {
    match err.server_message() {
        Some(message) => message.to_string(),
        None => format!("Failed to {verb} {resource}"),
    }
}

type Operation<I, T> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<T, ApiClientError>> + Send + Sync>;
type SideEffect<T> = Arc<dyn Fn(&T) + Send + Sync>;

#[derive(Debug, Default)]
struct Tracker {
    state: MutationState,
    /// Bumped by `reset`; completions from an older epoch are detached.
    epoch: u64,
}

/// One remote write, e.g. "create student".
///
/// On success every declared prefix is invalidated, then the optional side
/// effect runs. Errors are recorded in [`MutationState`] and also returned
/// so callers can keep a modal open.
pub struct Mutation<I, T> {
    verb: &'static str,
    resource: &'static str,
    operation: Operation<I, T>,
    invalidates: Vec<QueryKey>,
    on_success: Option<SideEffect<T>>,
    cache: QueryCache,
    tracker: Arc<Mutex<Tracker>>,
}

impl<I, T> Clone for Mutation<I, T> {
    fn clone(&self) -> Self {
        Self {
            verb: self.verb,
            resource: self.resource,
            operation: Arc::clone(&self.operation),
            invalidates: self.invalidates.clone(),
            on_success: self.on_success.clone(),
            cache: self.cache.clone(),
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<I, T> std::fmt::Debug for Mutation<I, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutation")
            .field("verb", &self.verb)
            .field("resource", &self.resource)
            .field("invalidates", &self.invalidates)
            .finish()
    }
}

impl<I, T> Mutation<I, T>
where
    I: Send + 'static,
    T: Send + 'static,
{
    pub fn new<F, Fut>(cache: QueryCache, verb: &'static str, resource: &'static str, operation: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiClientError>> + Send + 'static,
    {
        Self {
            verb,
            resource,
            operation: Arc::new(move |input| operation(input).boxed()),
            invalidates: Vec::new(),
            on_success: None,
            cache,
            tracker: Arc::new(Mutex::new(Tracker::default())),
        }
    }

    pub fn invalidates(mut self, prefix: QueryKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    pub fn invalidates_all(mut self, prefixes: impl IntoIterator<Item = QueryKey>) -> Self {
        self.invalidates.extend(prefixes);
        self
    }

    pub fn on_success(mut self, effect: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(effect));
        self
    }

    pub fn state(&self) -> MutationState {
        self.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().state.is_pending()
    }

    pub fn verb(&self) -> &'static str {
        self.verb
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Back to idle. An execution still in flight is detached: it will
    /// still invalidate the cache when it lands, but no longer touches this
    /// state or runs the side effect.
    pub fn reset(&self) {
        let mut tracker = self.lock();
        tracker.epoch += 1;
        tracker.state = MutationState::default();
    }

    pub async fn execute(&self, input: I) -> Result<T, MutationError> {
        let epoch = {
            let mut tracker = self.lock();
            if tracker.state.is_pending() {
                return Err(MutationError::AlreadyPending);
            }
            tracker.state = MutationState {
                status: MutationStatus::Pending,
                error: None,
            };
            tracker.epoch
        };

        let result = (self.operation)(input).await;

        match result {
            Ok(value) => {
                for prefix in &self.invalidates {
                    self.cache.invalidate(prefix);
                }
                let attached = self.settle(epoch, MutationStatus::Success, None);
                tracing::info!(verb = self.verb, resource = self.resource, attached, "mutation succeeded");
                if attached {
                    if let Some(effect) = &self.on_success {
                        effect(&value);
                    }
                }
                Ok(value)
            }
            Err(source) => {
                let message = failure_message(&source, self.verb, self.resource);
                let attached = self.settle(epoch, MutationStatus::Error, Some(message.clone()));
                tracing::warn!(
                    verb = self.verb,
                    resource = self.resource,
                    attached,
                    error = %source,
                    "mutation failed"
                );
                Err(MutationError::Failed { message, source })
            }
        }
    }

    fn settle(&self, epoch: u64, status: MutationStatus, error: Option<String>) -> bool {
        let mut tracker = self.lock();
        if tracker.epoch != epoch {
            return false;
        }
        tracker.state = MutationState { status, error };
        true
    }

    fn lock(&self) -> MutexGuard<'_, Tracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
