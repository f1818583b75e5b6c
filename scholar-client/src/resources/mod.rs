//! Per-resource declarations.
//!
//! Each resource names its cache-key root, its endpoints, how the page's
//! [`FilterSet`] maps onto the typed filter, which prefixes a write can
//! affect, its form draft and its table columns. Everything else (reading,
//! filtering, mutating, invalidating) lives once in
//! [`ResourceController`](crate::controller::ResourceController).

use crate::api_client::ApiClient;
use crate::error::ApiClientError;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError};
use crate::query::QueryKey;
use futures_util::future::BoxFuture;
use scholar_core::EntityIdType;

mod assignments;
mod classes;
mod curriculum;
pub mod dashboard;
mod diagnostics;
mod interventions;
mod notes;
mod reports;
mod students;
mod teachers;

pub use assignments::{AssignmentDraft, Assignments};
pub use classes::{ClassDraft, Classes, ClassSchedules};
pub use curriculum::{Activities, ActivityDraft, TopicDraft, Topics};
pub use diagnostics::{DiagnosticDraft, DiagnosticResults, Diagnostics};
pub use interventions::{InterventionDraft, Interventions};
pub use notes::{NoteDraft, Notes};
pub use reports::{ReportDraft, Reports};
pub use students::{StudentDraft, Students, YearGroups};
pub use teachers::{TeacherDraft, Teachers};

pub type ApiResult<T> = Result<T, ApiClientError>;

/// Input type produced by a resource's draft.
pub type DraftInput<R> = <<R as Resource>::Draft as Draft>::Input;

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    /// Relative width, in percent of the table.
    pub width: u16,
}

impl Column {
    pub const fn new(title: &'static str, width: u16) -> Self {
        Self { title, width }
    }
}

/// A filter the page offers, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub label: &'static str,
}

impl FilterField {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

/// How an entity shows up as a table row.
pub trait ListRow {
    fn columns() -> &'static [Column];

    fn cells(&self) -> Vec<String>;

    /// Human label, used by confirmation prompts.
    fn title(&self) -> String;

    /// Percentage rendered through the shared band colouring, if any.
    fn score(&self) -> Option<f64> {
        None
    }

    /// Index of the column `score` belongs to.
    fn score_column() -> Option<usize> {
        None
    }
}

pub trait Resource: Send + Sync + 'static {
    /// Cache-key root, also the first URL segment for most resources.
    const NAME: &'static str;
    /// Singular noun used in messages ("Failed to create student").
    const LABEL: &'static str;
    /// Page heading.
    const TITLE: &'static str;
    const EMPTY_MESSAGE: &'static str;
    const EDITABLE: bool = true;
    /// Label of the resource-specific row action, if it has one.
    const SECONDARY: Option<&'static str> = None;

    type Id: EntityIdType + std::fmt::Debug;
    type Item: ListRow + Clone + Send + Sync + 'static;
    type Draft: Draft<Entity = Self::Item, Id = Self::Id>;

    fn id(item: &Self::Item) -> Self::Id;

    fn filters() -> &'static [FilterField] {
        &[]
    }

    fn key() -> QueryKey {
        QueryKey::new(Self::NAME)
    }

    /// Prefixes a successful write to this resource can change.
    fn affected() -> Vec<QueryKey> {
        vec![Self::key()]
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Self::Item>>>;

    fn create(api: ApiClient, input: DraftInput<Self>) -> BoxFuture<'static, ApiResult<Self::Item>>;

    fn update(
        _api: ApiClient,
        _id: Self::Id,
        _input: DraftInput<Self>,
    ) -> BoxFuture<'static, ApiResult<Self::Item>> {
        Box::pin(async { Err(ApiClientError::Unsupported("editing this resource")) })
    }

    fn delete(api: ApiClient, id: Self::Id) -> BoxFuture<'static, ApiResult<()>>;

    fn secondary(_api: ApiClient, _id: Self::Id) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async { Err(ApiClientError::Unsupported("this action")) })
    }
}

pub(crate) fn keys(names: &[&str]) -> Vec<QueryKey> {
    names.iter().map(|name| QueryKey::new(*name)).collect()
}

/// Trimmed value, `None` when blank.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn non_empty_id<T: From<String>>(value: &str) -> Option<T> {
    non_empty(value).map(T::from)
}

pub(crate) fn parse_field<T: std::str::FromStr>(label: &'static str, value: &str) -> Result<T, FormError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| FormError::Invalid {
        label,
        reason: err.to_string(),
    })
}

pub(crate) fn csv(values: &[String]) -> String {
    values.join(", ")
}

pub(crate) fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(crate) fn opt_id<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_trim_and_split() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" Y7 ").as_deref(), Some("Y7"));
        assert_eq!(split_csv("Maths, ,Physics"), vec!["Maths", "Physics"]);
        assert!(matches!(
            parse_field::<u32>("Questions", "ten"),
            Err(FormError::Invalid { label: "Questions", .. })
        ));
    }

    #[test]
    fn fan_out_covers_dependent_views() {
        let roots = |keys: Vec<QueryKey>| {
            keys.iter()
                .filter_map(|k| k.root().map(str::to_string))
                .collect::<Vec<_>>()
        };
        assert_eq!(roots(Students::affected()), vec!["students", "classes", "dashboard"]);
        assert_eq!(roots(Classes::affected()), vec!["classes", "students", "dashboard"]);
        assert_eq!(roots(Teachers::affected()), vec!["teachers", "classes"]);
        assert_eq!(roots(Topics::affected()), vec!["topics", "activities"]);
        assert_eq!(roots(Activities::affected()), vec!["activities", "dashboard"]);
        assert_eq!(roots(Assignments::affected()), vec!["assignments", "activities"]);
        assert_eq!(
            roots(Interventions::affected()),
            vec!["interventions", "dashboard", "students"]
        );
        assert_eq!(roots(Notes::affected()), vec!["notes"]);
        assert_eq!(roots(Reports::affected()), vec!["reports"]);
        assert_eq!(roots(Diagnostics::affected()), vec!["diagnostic-tests"]);
    }
}
