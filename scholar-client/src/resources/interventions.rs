use super::{keys, non_empty, non_empty_id, opt_id, opt_str, parse_field, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::display::format_date;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField};
use crate::query::QueryKey;
use futures_util::future::BoxFuture;
use scholar_core::{
    Intervention, InterventionFilter, InterventionId, InterventionInput, InterventionStatus,
    StudentId,
};

pub struct Interventions;

impl Resource for Interventions {
    const NAME: &'static str = "interventions";
    const LABEL: &'static str = "intervention";
    const TITLE: &'static str = "Interventions";
    const EMPTY_MESSAGE: &'static str = "No interventions planned";
    const SECONDARY: Option<&'static str> = Some("Complete");

    type Id = InterventionId;
    type Item = Intervention;
    type Draft = InterventionDraft;

    fn id(item: &Intervention) -> InterventionId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("studentId", "Student"),
            FilterField::new("status", "Status"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["interventions", "dashboard", "students"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Intervention>>> {
        Box::pin(async move {
            let filter = InterventionFilter {
                student_id: filters.value("studentId"),
                status: filters.parsed("status"),
            };
            api.list_interventions(&filter).await
        })
    }

    fn create(api: ApiClient, input: InterventionInput) -> BoxFuture<'static, ApiResult<Intervention>> {
        Box::pin(async move { api.create_intervention(&input).await })
    }

    fn update(
        api: ApiClient,
        id: InterventionId,
        input: InterventionInput,
    ) -> BoxFuture<'static, ApiResult<Intervention>> {
        Box::pin(async move { api.update_intervention(&id, &input).await })
    }

    fn delete(api: ApiClient, id: InterventionId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_intervention(&id).await })
    }

    fn secondary(api: ApiClient, id: InterventionId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.complete_intervention(&id).await.map(|_| ()) })
    }
}

impl ListRow for Intervention {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Title", 34),
            Column::new("Student", 24),
            Column::new("Status", 12),
            Column::new("Start", 15),
            Column::new("End", 15),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.student_name
                .clone()
                .unwrap_or_else(|| self.student_id.to_string()),
            self.status.to_string(),
            format_date(self.start_date),
            format_date(self.end_date),
        ]
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionDraft {
    pub student_id: String,
    pub topic_id: String,
    pub title: String,
    pub status: InterventionStatus,
    pub notes: String,
}

impl Draft for InterventionDraft {
    type Entity = Intervention;
    type Id = InterventionId;
    type Input = InterventionInput;

    fn from_entity(intervention: &Intervention) -> Self {
        Self {
            student_id: intervention.student_id.to_string(),
            topic_id: opt_id(&intervention.topic_id),
            title: intervention.title.clone(),
            status: intervention.status,
            notes: opt_str(&intervention.notes),
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("studentId", "Student", self.student_id.clone()),
            FormField::required("title", "Title", self.title.clone()),
            FormField::optional("topicId", "Topic", self.topic_id.clone()),
            FormField::required("status", "Status", self.status.to_string()),
            FormField::optional("notes", "Notes", self.notes.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "studentId" => self.student_id = value.to_string(),
            "topicId" => self.topic_id = value.to_string(),
            "title" => self.title = value.to_string(),
            "status" => self.status = parse_field("Status", value)?,
            "notes" => self.notes = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<InterventionInput, FormError> {
        Ok(InterventionInput {
            student_id: StudentId::from(self.student_id.trim()),
            topic_id: non_empty_id(&self.topic_id),
            title: self.title.trim().to_string(),
            status: self.status,
            notes: non_empty(&self.notes),
        })
    }
}
