use super::{csv, keys, split_csv, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField, Selection};
use crate::query::QueryKey;
use futures_util::future::BoxFuture;
use scholar_core::{ClassId, Teacher, TeacherFilter, TeacherId, TeacherInput};

pub struct Teachers;

impl Resource for Teachers {
    const NAME: &'static str = "teachers";
    const LABEL: &'static str = "teacher";
    const TITLE: &'static str = "Teachers";
    const EMPTY_MESSAGE: &'static str = "No teachers yet";

    type Id = TeacherId;
    type Item = Teacher;
    type Draft = TeacherDraft;

    fn id(item: &Teacher) -> TeacherId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("search", "Search"),
            FilterField::new("subject", "Subject"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["teachers", "classes"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Teacher>>> {
        Box::pin(async move {
            let filter = TeacherFilter {
                search: filters.value("search"),
                subject: filters.value("subject"),
            };
            api.list_teachers(&filter).await
        })
    }

    fn create(api: ApiClient, input: TeacherInput) -> BoxFuture<'static, ApiResult<Teacher>> {
        Box::pin(async move { api.create_teacher(&input).await })
    }

    fn update(api: ApiClient, id: TeacherId, input: TeacherInput) -> BoxFuture<'static, ApiResult<Teacher>> {
        Box::pin(async move { api.update_teacher(&id, &input).await })
    }

    fn delete(api: ApiClient, id: TeacherId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_teacher(&id).await })
    }
}

impl ListRow for Teacher {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Name", 28),
            Column::new("Email", 34),
            Column::new("Subjects", 26),
            Column::new("Classes", 12),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.email.clone(),
            csv(&self.subjects),
            self.class_ids.len().to_string(),
        ]
    }

    fn title(&self) -> String {
        self.full_name()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subjects: String,
    pub class_ids: Selection<ClassId>,
}

impl Draft for TeacherDraft {
    type Entity = Teacher;
    type Id = TeacherId;
    type Input = TeacherInput;

    fn from_entity(teacher: &Teacher) -> Self {
        Self {
            first_name: teacher.first_name.clone(),
            last_name: teacher.last_name.clone(),
            email: teacher.email.clone(),
            subjects: csv(&teacher.subjects),
            class_ids: teacher.class_ids.iter().cloned().collect(),
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("firstName", "First name", self.first_name.clone()),
            FormField::required("lastName", "Last name", self.last_name.clone()),
            FormField::required("email", "Email", self.email.clone()),
            FormField::optional("subjects", "Subjects", self.subjects.clone()),
            FormField::optional("classIds", "Classes", self.class_ids.to_csv()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "firstName" => self.first_name = value.to_string(),
            "lastName" => self.last_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "subjects" => self.subjects = value.to_string(),
            "classIds" => self.class_ids = Selection::from_csv(value),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<TeacherInput, FormError> {
        Ok(TeacherInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            subjects: split_csv(&self.subjects),
            class_ids: self.class_ids.to_vec(),
        })
    }
}
