use super::{keys, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::display::{format_date, format_percent};
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField, Selection};
use crate::query::QueryKey;
use chrono::NaiveDate;
use futures_util::future::BoxFuture;
use scholar_core::{
    ActivityId, Assignment, AssignmentFilter, AssignmentId, AssignmentInput, ClassId, StudentId,
    Timestamp,
};

pub struct Assignments;

impl Resource for Assignments {
    const NAME: &'static str = "assignments";
    const LABEL: &'static str = "assignment";
    const TITLE: &'static str = "Assignments";
    const EMPTY_MESSAGE: &'static str = "Nothing has been assigned yet";

    type Id = AssignmentId;
    type Item = Assignment;
    type Draft = AssignmentDraft;

    fn id(item: &Assignment) -> AssignmentId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("classId", "Class"),
            FilterField::new("activityId", "Activity"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["assignments", "activities"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Assignment>>> {
        Box::pin(async move {
            let filter = AssignmentFilter {
                class_id: filters.value("classId"),
                activity_id: filters.value("activityId"),
            };
            api.list_assignments(&filter).await
        })
    }

    fn create(api: ApiClient, input: AssignmentInput) -> BoxFuture<'static, ApiResult<Assignment>> {
        Box::pin(async move { api.create_assignment(&input).await })
    }

    fn update(
        api: ApiClient,
        id: AssignmentId,
        input: AssignmentInput,
    ) -> BoxFuture<'static, ApiResult<Assignment>> {
        Box::pin(async move { api.update_assignment(&id, &input).await })
    }

    fn delete(api: ApiClient, id: AssignmentId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_assignment(&id).await })
    }
}

impl ListRow for Assignment {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Activity", 36),
            Column::new("Classes", 12),
            Column::new("Students", 12),
            Column::new("Due", 20),
            Column::new("Completion", 20),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.activity_title
                .clone()
                .unwrap_or_else(|| self.activity_id.to_string()),
            self.class_ids.len().to_string(),
            self.student_ids.len().to_string(),
            format_date(self.due_date),
            format_percent(self.completion_rate),
        ]
    }

    fn title(&self) -> String {
        self.activity_title
            .clone()
            .unwrap_or_else(|| format!("assignment {}", self.id))
    }

    fn score(&self) -> Option<f64> {
        self.completion_rate
    }

    fn score_column() -> Option<usize> {
        Some(4)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentDraft {
    pub activity_id: String,
    pub class_ids: Selection<ClassId>,
    pub student_ids: Selection<StudentId>,
    /// `YYYY-MM-DD`, blank for no due date.
    pub due_date: String,
}

fn parse_due_date(raw: &str) -> Result<Option<Timestamp>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| FormError::Invalid {
        label: "Due date",
        reason: "expected YYYY-MM-DD".to_string(),
    })?;
    Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
}

impl Draft for AssignmentDraft {
    type Entity = Assignment;
    type Id = AssignmentId;
    type Input = AssignmentInput;

    fn from_entity(assignment: &Assignment) -> Self {
        Self {
            activity_id: assignment.activity_id.to_string(),
            class_ids: assignment.class_ids.iter().cloned().collect(),
            student_ids: assignment.student_ids.iter().cloned().collect(),
            due_date: assignment
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("activityId", "Activity", self.activity_id.clone()),
            FormField::optional("classIds", "Classes", self.class_ids.to_csv()),
            FormField::optional("studentIds", "Students", self.student_ids.to_csv()),
            FormField::optional("dueDate", "Due date", self.due_date.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "activityId" => self.activity_id = value.to_string(),
            "classIds" => self.class_ids = Selection::from_csv(value),
            "studentIds" => self.student_ids = Selection::from_csv(value),
            "dueDate" => {
                parse_due_date(value)?;
                self.due_date = value.trim().to_string();
            }
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<AssignmentInput, FormError> {
        Ok(AssignmentInput {
            activity_id: ActivityId::from(self.activity_id.trim()),
            class_ids: self.class_ids.to_vec(),
            student_ids: self.student_ids.to_vec(),
            due_date: parse_due_date(&self.due_date)?,
        })
    }
}
