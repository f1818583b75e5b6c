//! Diagnostic test API types

use serde::{Deserialize, Serialize};

use super::null_as_empty;
use crate::{ClassId, DiagnosticTestId, StudentId, Timestamp, TopicId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticTest {
    pub id: DiagnosticTestId,
    pub title: String,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic_ids: Vec<TopicId>,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticTestInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    pub topic_ids: Vec<TopicId>,
    pub question_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
}

/// One student's outcome on a diagnostic test, with server-detected gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub student_id: StudentId,
    #[serde(default)]
    pub student_name: Option<String>,
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skill_gaps: Vec<String>,
}
