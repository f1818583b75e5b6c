//! Dashboard metric types
//!
//! Each metric is served by its own endpoint and loads independently.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_students: u32,
    pub total_classes: u32,
    pub total_teachers: u32,
    #[serde(default)]
    pub pending_activities: u32,
}

/// Average performance for one slice (year group, subject, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSlice {
    pub label: String,
    pub average_score: f64,
}
