//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod modal;
pub mod progress;
pub mod status;

pub use detail::{DetailPanel, Related};
pub use filter::{FilterBar, FilterOption};
pub use modal::{centered_rect, FieldLine, MenuPanel, ModalPanel};
pub use progress::ScoreBar;
pub use status::StatusIndicator;
