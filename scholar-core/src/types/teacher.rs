//! Teacher-related API types

use serde::{Deserialize, Serialize};

use super::null_as_empty;
use crate::{ClassId, TeacherId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub class_ids: Vec<ClassId>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        crate::full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subjects: Vec<String>,
    pub class_ids: Vec<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeacherFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}
