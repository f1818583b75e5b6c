//! Assignment API types

use serde::{Deserialize, Serialize};

use super::null_as_empty;
use crate::{ActivityId, AssignmentId, ClassId, StudentId, Timestamp};

/// An activity handed out to classes and/or individual students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub activity_id: ActivityId,
    #[serde(default)]
    pub activity_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub class_ids: Vec<ClassId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_ids: Vec<StudentId>,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    /// Percentage of recipients that submitted.
    #[serde(default)]
    pub completion_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub activity_id: ActivityId,
    pub class_ids: Vec<ClassId>,
    pub student_ids: Vec<StudentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<ActivityId>,
}
