//! Dashboard metrics.
//!
//! Each panel has its own key and loads on its own; there is no barrier
//! across them, so a slow metric never holds up the others.

use crate::api_client::ApiClient;
use crate::query::{QueryCache, QueryKey, QueryState};
use scholar_core::{Activity, DashboardOverview, Intervention, PerformanceSlice};

pub const ROOT: &str = "dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Overview,
    Performance,
    RecentActivities,
    Interventions,
}

impl Metric {
    pub fn all() -> [Metric; 4] {
        [
            Metric::Overview,
            Metric::Performance,
            Metric::RecentActivities,
            Metric::Interventions,
        ]
    }

    pub fn key(&self) -> QueryKey {
        let leaf = match self {
            Metric::Overview => "overview",
            Metric::Performance => "performance",
            Metric::RecentActivities => "recent-activities",
            Metric::Interventions => "interventions",
        };
        QueryKey::new(ROOT).path(leaf)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Overview => "Overview",
            Metric::Performance => "Performance",
            Metric::RecentActivities => "Recent activities",
            Metric::Interventions => "Active interventions",
        }
    }
}

/// Read-through accessors for the four panels.
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: ApiClient,
    cache: QueryCache,
}

impl Dashboard {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub fn overview(&self) -> QueryState<DashboardOverview> {
        let api = self.api.clone();
        self.cache
            .read(&Metric::Overview.key(), move || async move { api.dashboard_overview().await })
    }

    pub fn performance(&self) -> QueryState<Vec<PerformanceSlice>> {
        let api = self.api.clone();
        self.cache.read(&Metric::Performance.key(), move || async move {
            api.dashboard_performance().await
        })
    }

    pub fn recent_activities(&self) -> QueryState<Vec<Activity>> {
        let api = self.api.clone();
        self.cache.read(&Metric::RecentActivities.key(), move || async move {
            api.recent_activities().await
        })
    }

    pub fn interventions(&self) -> QueryState<Vec<Intervention>> {
        let api = self.api.clone();
        self.cache.read(&Metric::Interventions.key(), move || async move {
            api.active_interventions().await
        })
    }

    /// Kick off all four reads at once.
    pub fn prefetch(&self) {
        let _ = self.overview();
        let _ = self.performance();
        let _ = self.recent_activities();
        let _ = self.interventions();
    }

    pub fn refresh(&self) -> usize {
        self.cache.invalidate(&QueryKey::new(ROOT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_keys_are_distinct_and_share_root() {
        let keys: Vec<_> = Metric::all().iter().map(Metric::key).collect();
        for (i, a) in keys.iter().enumerate() {
            assert!(a.starts_with(&QueryKey::new(ROOT)));
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
