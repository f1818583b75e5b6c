//! Student-related API types

use serde::{Deserialize, Serialize};

use super::null_as_empty;
use crate::{ClassId, StudentId, Timestamp, YearGroupId};

/// Student record as listed by `/students`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub year_group_id: Option<YearGroupId>,
    #[serde(default)]
    pub year_group_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub class_ids: Vec<ClassId>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Mean score across assessed work, as a percentage.
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Student {
    pub fn full_name(&self) -> String {
        crate::full_name(&self.first_name, &self.last_name)
    }
}

/// Body for creating or updating a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_group_id: Option<YearGroupId>,
    pub class_ids: Vec<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_group_id: Option<YearGroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearGroup {
    pub id: YearGroupId,
    pub name: String,
}
