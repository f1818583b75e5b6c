//! Scholar Client
//!
//! Everything between the terminal front-end and the Scholar REST API:
//! - [`ApiClient`]: typed facade over every endpoint, with bearer auth and
//!   session teardown on 401
//! - [`SessionService`]: the persisted, observable signed-in session
//! - [`QueryCache`]: keyed async results with prefix invalidation
//! - [`Mutation`], [`FormModal`], [`ConfirmDialog`]: writes and the form
//!   lifecycle around them
//! - [`ResourceController`]: one generic controller per resource page

pub mod api_client;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod filter;
pub mod form;
pub mod list;
pub mod mutation;
pub mod query;
pub mod resources;
pub mod session;

pub use api_client::{ApiClient, Upload};
pub use config::{config_path, ClientConfig, ConfigError};
pub use controller::ResourceController;
pub use display::{band, format_date, format_percent, percent, Band, BandThresholds, Tone};
pub use error::{ApiClientError, ErrorKind, QueryError};
pub use filter::{FilterSet, FilterState};
pub use form::{ConfirmDialog, Draft, FormError, FormField, FormModal, ModalMode, ModalPhase, Selection};
pub use list::{render_decision, ListRender, RowAction, RowActions};
pub use mutation::{failure_message, Mutation, MutationError, MutationState, MutationStatus};
pub use query::{QueryCache, QueryKey, QueryState, QueryStatus};
pub use resources::{ListRow, Resource};
pub use session::{FileStore, KeyValueStore, MemoryStore, Session, SessionError, SessionService};
