//! Pages: one per navigable view.
//!
//! A page owns its list controller and UI state (selection, open modal,
//! filter prompt). The event loop talks to the active page through the
//! object-safe [`Page`] trait.

mod dashboard;
mod resource;
pub mod tools;

pub use dashboard::DashboardPage;
pub use resource::ResourcePage;

use crate::events::TuiEvent;
use crate::keys::{Action, TextKey};
use crate::nav::View;
use crate::theme::ScholarTheme;
use ratatui::{layout::Rect, Frame};
use scholar_client::resources::{
    Activities, Assignments, Classes, Diagnostics, Interventions, Notes, Reports, Students, Teachers,
    Topics,
};
use scholar_client::{ApiClient, BandThresholds, QueryCache};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Read-only inputs every page renders with.
pub struct PageContext<'a> {
    pub theme: &'a ScholarTheme,
    pub bands: BandThresholds,
}

pub trait Page {
    fn view(&self) -> View;

    fn render(&mut self, f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>);

    fn handle(&mut self, action: Action);

    /// True while a form or prompt owns the keyboard.
    fn captures_text(&self) -> bool {
        false
    }

    fn handle_text(&mut self, _key: TextKey) {}

    /// A spawned form submission settled.
    fn on_submitted(&mut self, _epoch: u64, _result: Result<(), String>) {}

    fn refetch(&mut self);

    /// Footer key hints for the current page state.
    fn hint(&self) -> &'static str;
}

pub type Pages = HashMap<View, Box<dyn Page>>;

pub fn build_pages(api: &ApiClient, cache: &QueryCache, events: &mpsc::Sender<TuiEvent>) -> Pages {
    let pages: Vec<Box<dyn Page>> = vec![
        Box::new(DashboardPage::new(api.clone(), cache.clone())),
        Box::new(
            ResourcePage::<Students>::new(View::Students, api, cache, events)
                .with_tools(tools::student_tools(api, cache))
                .with_filter_note(tools::year_group_note(api, cache)),
        ),
        Box::new(
            ResourcePage::<Classes>::new(View::Classes, api, cache, events)
                .with_tools(tools::class_tools(api, cache))
                .with_section(tools::class_schedule_section(api, cache))
                .with_filter_note(tools::year_group_note(api, cache)),
        ),
        Box::new(ResourcePage::<Teachers>::new(View::Teachers, api, cache, events)),
        Box::new(
            ResourcePage::<Topics>::new(View::Topics, api, cache, events)
                .with_tools(tools::topic_tools(api, cache)),
        ),
        Box::new(ResourcePage::<Activities>::new(View::Activities, api, cache, events)),
        Box::new(ResourcePage::<Assignments>::new(View::Assignments, api, cache, events)),
        Box::new(
            ResourcePage::<Diagnostics>::new(View::Diagnostics, api, cache, events)
                .with_section(tools::diagnostic_results_section(api, cache)),
        ),
        Box::new(ResourcePage::<Interventions>::new(View::Interventions, api, cache, events)),
        Box::new(ResourcePage::<Notes>::new(View::Notes, api, cache, events)),
        Box::new(ResourcePage::<Reports>::new(View::Reports, api, cache, events)),
    ];
    pages.into_iter().map(|page| (page.view(), page)).collect()
}
