//! API request and response types.
//!
//! Every type mirrors the camelCase JSON used by the Scholar REST API.
//! Filters are plain structs serialized as query strings; `None` fields are
//! omitted so an empty filter means "no filter".

mod auth;
pub use auth::*;

mod common;
pub use common::*;

mod student;
pub use student::*;

mod class;
pub use class::*;

mod teacher;
pub use teacher::*;

mod curriculum;
pub use curriculum::*;

mod assignment;
pub use assignment::*;

mod diagnostic;
pub use diagnostic::*;

mod intervention;
pub use intervention::*;

mod note;
pub use note::*;

mod report;
pub use report::*;

mod dashboard;
pub use dashboard::*;
