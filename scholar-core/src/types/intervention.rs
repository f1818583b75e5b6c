//! Intervention API types

use serde::{Deserialize, Serialize};

use crate::{InterventionId, InterventionStatus, StudentId, Timestamp, TopicId};

/// A targeted support plan for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: InterventionId,
    pub student_id: StudentId,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    pub title: String,
    pub status: InterventionStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub start_date: Option<Timestamp>,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InterventionInput {
    pub student_id: StudentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    pub title: String,
    pub status: InterventionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InterventionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterventionStatus>,
}
