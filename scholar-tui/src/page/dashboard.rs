//! Dashboard page: four metric panels, each loading on its own.

use super::{Page, PageContext};
use crate::keys::Action;
use crate::nav::View;
use crate::views;
use ratatui::{layout::Rect, Frame};
use scholar_client::resources::dashboard::Dashboard;
use scholar_client::{ApiClient, QueryCache};

pub struct DashboardPage {
    pub(crate) dashboard: Dashboard,
}

impl DashboardPage {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self {
            dashboard: Dashboard::new(api, cache),
        }
    }
}

impl Page for DashboardPage {
    fn view(&self) -> View {
        View::Dashboard
    }

    fn render(&mut self, f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>) {
        views::dashboard::render(f, area, ctx, &self.dashboard);
    }

    fn handle(&mut self, action: Action) {
        if action == Action::Refresh {
            self.refetch();
        }
    }

    fn refetch(&mut self) {
        let invalidated = self.dashboard.refresh();
        tracing::debug!(invalidated, "dashboard refresh");
    }

    fn hint(&self) -> &'static str {
        "Tab switch view • 1-9 jump • r refresh • L sign out • ? help • q quit"
    }
}
