//! Report generation API types

use serde::{Deserialize, Serialize};

use crate::{ReportId, ReportKind, ReportStatus, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub kind: ReportKind,
    pub status: ReportStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Body for `POST /reports/generate`.
///
/// `subject_id` names the student, class or year group the report covers,
/// depending on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub title: String,
    pub kind: ReportKind,
    pub subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}
