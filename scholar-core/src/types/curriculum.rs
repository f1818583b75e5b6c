//! Curriculum topics, generated activities and PDF analysis types

use serde::{Deserialize, Serialize};

use super::null_as_empty;
use crate::{ActivityId, ActivityKind, ActivityStatus, Difficulty, Timestamp, TopicId, YearGroupId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub year_group_id: Option<YearGroupId>,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordering within the scheme of work.
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopicInput {
    pub title: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_group_id: Option<YearGroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopicFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_group_id: Option<YearGroupId>,
}

/// Result of server-side analysis of an uploaded curriculum PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumAnalysis {
    pub topics_created: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub topic_id: TopicId,
    #[serde(default)]
    pub topic_title: Option<String>,
    pub kind: ActivityKind,
    pub difficulty: Difficulty,
    pub status: ActivityStatus,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Body for `POST /curriculum/activities/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateActivityRequest {
    pub topic_id: TopicId,
    pub kind: ActivityKind,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Manual edits to a generated activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    pub title: String,
    pub kind: ActivityKind,
    pub difficulty: Difficulty,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityKind>,
}
