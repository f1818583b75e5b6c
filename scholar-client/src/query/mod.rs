//! Keyed cache of asynchronous query results.
//!
//! Pages read through [`QueryCache`] with a [`QueryKey`] and a fetch closure.
//! Reads never block: they return the current [`QueryState`] snapshot and
//! start a fetch in the background when the entry is missing or stale.
//! Mutations invalidate by key prefix so every view sharing a prefix
//! refetches on its next read.

mod cache;
mod key;
mod state;

pub use cache::QueryCache;
pub use key::{KeySegment, QueryKey};
pub use state::{QueryState, QueryStatus};
