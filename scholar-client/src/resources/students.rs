use super::{keys, non_empty, non_empty_id, opt_id, opt_str, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::{ApiClient, Upload};
use crate::display::format_percent;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField, Selection};
use crate::mutation::Mutation;
use crate::query::{QueryCache, QueryKey, QueryState};
use futures_util::future::BoxFuture;
use scholar_core::{
    ClassId, ImportSummary, Student, StudentFilter, StudentId, StudentInput, UploadedAsset,
    YearGroup,
};

pub struct Students;

impl Resource for Students {
    const NAME: &'static str = "students";
    const LABEL: &'static str = "student";
    const TITLE: &'static str = "Students";
    const EMPTY_MESSAGE: &'static str = "No students match the current filters";

    type Id = StudentId;
    type Item = Student;
    type Draft = StudentDraft;

    fn id(item: &Student) -> StudentId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("search", "Search"),
            FilterField::new("yearGroupId", "Year group"),
            FilterField::new("classId", "Class"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["students", "classes", "dashboard"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Student>>> {
        Box::pin(async move {
            let filter = StudentFilter {
                search: filters.value("search"),
                year_group_id: filters.value("yearGroupId"),
                class_id: filters.value("classId"),
            };
            api.list_students(&filter).await
        })
    }

    fn create(api: ApiClient, input: StudentInput) -> BoxFuture<'static, ApiResult<Student>> {
        Box::pin(async move { api.create_student(&input).await })
    }

    fn update(api: ApiClient, id: StudentId, input: StudentInput) -> BoxFuture<'static, ApiResult<Student>> {
        Box::pin(async move { api.update_student(&id, &input).await })
    }

    fn delete(api: ApiClient, id: StudentId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_student(&id).await })
    }
}

impl Students {
    /// Bulk CSV import. Touches the same views as a single create.
    pub fn import(api: &ApiClient, cache: &QueryCache) -> Mutation<Upload, ImportSummary> {
        let api = api.clone();
        Mutation::new(cache.clone(), "import", "students", move |file: Upload| {
            let api = api.clone();
            async move { api.import_students(file).await }
        })
        .invalidates_all(Self::affected())
    }

    pub fn upload_avatar(api: &ApiClient, cache: &QueryCache) -> Mutation<(StudentId, Upload), UploadedAsset> {
        let api = api.clone();
        Mutation::new(cache.clone(), "upload", "avatar", move |(id, image): (StudentId, Upload)| {
            let api = api.clone();
            async move { api.upload_student_avatar(&id, image).await }
        })
        .invalidates(QueryKey::new(Self::NAME))
    }
}

impl ListRow for Student {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Name", 30),
            Column::new("Year", 12),
            Column::new("Email", 38),
            Column::new("Average", 20),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.year_group_name
                .clone()
                .or_else(|| self.year_group_id.as_ref().map(ToString::to_string))
                .unwrap_or_default(),
            opt_str(&self.email),
            format_percent(self.average_score),
        ]
    }

    fn title(&self) -> String {
        self.full_name()
    }

    fn score(&self) -> Option<f64> {
        self.average_score
    }

    fn score_column() -> Option<usize> {
        Some(3)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub year_group_id: String,
    pub class_ids: Selection<ClassId>,
}

impl Draft for StudentDraft {
    type Entity = Student;
    type Id = StudentId;
    type Input = StudentInput;

    fn from_entity(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: opt_str(&student.email),
            year_group_id: opt_id(&student.year_group_id),
            class_ids: student.class_ids.iter().cloned().collect(),
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("firstName", "First name", self.first_name.clone()),
            FormField::required("lastName", "Last name", self.last_name.clone()),
            FormField::optional("email", "Email", self.email.clone()),
            FormField::optional("yearGroupId", "Year group", self.year_group_id.clone()),
            FormField::optional("classIds", "Classes", self.class_ids.to_csv()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "firstName" => self.first_name = value.to_string(),
            "lastName" => self.last_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "yearGroupId" => self.year_group_id = value.to_string(),
            "classIds" => self.class_ids = Selection::from_csv(value),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<StudentInput, FormError> {
        Ok(StudentInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: non_empty(&self.email),
            year_group_id: non_empty_id(&self.year_group_id),
            class_ids: self.class_ids.to_vec(),
        })
    }
}

/// Year-group lookup used by filters and forms.
pub struct YearGroups;

impl YearGroups {
    pub fn key() -> QueryKey {
        QueryKey::new("year-groups")
    }

    pub fn read(api: &ApiClient, cache: &QueryCache) -> QueryState<Vec<YearGroup>> {
        let api = api.clone();
        cache.read(&Self::key(), move || async move { api.list_year_groups().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_round_trips_entity_fields() {
        let student: Student = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "yearGroupId": "Y7",
            "classIds": ["c2", "c1"],
            "averageScore": 91.0
        }))
        .unwrap();
        let draft = StudentDraft::from_entity(&student);
        let input = draft.to_input().unwrap();
        assert_eq!(input.year_group_id, Some("Y7".into()));
        assert_eq!(input.class_ids, vec![ClassId::from("c1"), ClassId::from("c2")]);
        assert_eq!(input.email, None);
        assert_eq!(student.cells()[3], "91%");
    }

    #[test]
    fn class_selection_is_edited_as_csv() {
        let mut draft = StudentDraft::default();
        draft.set_field("classIds", "c3, c1,,").unwrap();
        assert_eq!(draft.class_ids.len(), 2);
        assert!(draft.class_ids.contains(&ClassId::from("c3")));
        assert!(draft.set_field("nickname", "x").is_err());
        assert_eq!(
            draft.validate(),
            Err(FormError::Required { label: "First name" })
        );
    }
}
