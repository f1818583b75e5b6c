//! Class and timetable API types

use serde::{Deserialize, Serialize};

use super::null_as_empty;
use crate::{ClassId, DayOfWeek, ScheduleId, StudentId, TeacherId, YearGroupId};

/// A teaching group (named `SchoolClass` because `class` is reserved in
/// most of the tooling that consumes the JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub year_group_id: Option<YearGroupId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub teacher_ids: Vec<TeacherId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_ids: Vec<StudentId>,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_group_id: Option<YearGroupId>,
    pub teacher_ids: Vec<TeacherId>,
    pub student_ids: Vec<StudentId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_group_id: Option<YearGroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Body for `POST /classes/{id}/students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStudentsRequest {
    pub student_ids: Vec<StudentId>,
}

/// One weekly timetable slot of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    pub id: ScheduleId,
    pub class_id: ClassId,
    pub day_of_week: DayOfWeek,
    /// `HH:MM`, 24h.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}
