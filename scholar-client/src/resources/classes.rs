use super::{keys, non_empty, non_empty_id, opt_id, opt_str, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::display::format_percent;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField, Selection};
use crate::mutation::Mutation;
use crate::query::{QueryCache, QueryKey, QueryState};
use futures_util::future::BoxFuture;
use scholar_core::{
    ClassFilter, ClassId, ClassInput, ClassSchedule, ScheduleId, ScheduleInput, SchoolClass,
    StudentId, TeacherId,
};

pub struct Classes;

impl Resource for Classes {
    const NAME: &'static str = "classes";
    const LABEL: &'static str = "class";
    const TITLE: &'static str = "Classes";
    const EMPTY_MESSAGE: &'static str = "No classes yet";

    type Id = ClassId;
    type Item = SchoolClass;
    type Draft = ClassDraft;

    fn id(item: &SchoolClass) -> ClassId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("search", "Search"),
            FilterField::new("yearGroupId", "Year group"),
            FilterField::new("subject", "Subject"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["classes", "students", "dashboard"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<SchoolClass>>> {
        Box::pin(async move {
            let filter = ClassFilter {
                search: filters.value("search"),
                year_group_id: filters.value("yearGroupId"),
                subject: filters.value("subject"),
            };
            api.list_classes(&filter).await
        })
    }

    fn create(api: ApiClient, input: ClassInput) -> BoxFuture<'static, ApiResult<SchoolClass>> {
        Box::pin(async move { api.create_class(&input).await })
    }

    fn update(api: ApiClient, id: ClassId, input: ClassInput) -> BoxFuture<'static, ApiResult<SchoolClass>> {
        Box::pin(async move { api.update_class(&id, &input).await })
    }

    fn delete(api: ApiClient, id: ClassId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_class(&id).await })
    }
}

impl Classes {
    /// Add students to a class without resubmitting the whole form.
    pub fn assign_students(
        api: &ApiClient,
        cache: &QueryCache,
    ) -> Mutation<(ClassId, Vec<StudentId>), SchoolClass> {
        let api = api.clone();
        Mutation::new(
            cache.clone(),
            "assign",
            "students",
            move |(id, students): (ClassId, Vec<StudentId>)| {
                let api = api.clone();
                async move { api.assign_students(&id, &students).await }
            },
        )
        .invalidates_all(keys(&["classes", "students"]))
    }

    pub fn remove_student(api: &ApiClient, cache: &QueryCache) -> Mutation<(ClassId, StudentId), ()> {
        let api = api.clone();
        Mutation::new(
            cache.clone(),
            "remove",
            "student from class",
            move |(id, student): (ClassId, StudentId)| {
                let api = api.clone();
                async move { api.remove_student_from_class(&id, &student).await }
            },
        )
        .invalidates_all(keys(&["classes", "students"]))
    }
}

impl ListRow for SchoolClass {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Name", 30),
            Column::new("Subject", 25),
            Column::new("Year", 12),
            Column::new("Students", 13),
            Column::new("Average", 20),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt_str(&self.subject),
            opt_id(&self.year_group_id),
            self.student_count.max(self.student_ids.len() as u32).to_string(),
            format_percent(self.average_score),
        ]
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn score(&self) -> Option<f64> {
        self.average_score
    }

    fn score_column() -> Option<usize> {
        Some(4)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDraft {
    pub name: String,
    pub subject: String,
    pub year_group_id: String,
    pub teacher_ids: Selection<TeacherId>,
    pub student_ids: Selection<StudentId>,
}

impl Draft for ClassDraft {
    type Entity = SchoolClass;
    type Id = ClassId;
    type Input = ClassInput;

    fn from_entity(class: &SchoolClass) -> Self {
        Self {
            name: class.name.clone(),
            subject: opt_str(&class.subject),
            year_group_id: opt_id(&class.year_group_id),
            teacher_ids: class.teacher_ids.iter().cloned().collect(),
            student_ids: class.student_ids.iter().cloned().collect(),
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("name", "Name", self.name.clone()),
            FormField::optional("subject", "Subject", self.subject.clone()),
            FormField::optional("yearGroupId", "Year group", self.year_group_id.clone()),
            FormField::optional("teacherIds", "Teachers", self.teacher_ids.to_csv()),
            FormField::optional("studentIds", "Students", self.student_ids.to_csv()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "name" => self.name = value.to_string(),
            "subject" => self.subject = value.to_string(),
            "yearGroupId" => self.year_group_id = value.to_string(),
            "teacherIds" => self.teacher_ids = Selection::from_csv(value),
            "studentIds" => self.student_ids = Selection::from_csv(value),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<ClassInput, FormError> {
        Ok(ClassInput {
            name: self.name.trim().to_string(),
            subject: non_empty(&self.subject),
            year_group_id: non_empty_id(&self.year_group_id),
            teacher_ids: self.teacher_ids.to_vec(),
            student_ids: self.student_ids.to_vec(),
        })
    }
}

/// Weekly timetable of one class. Keys live under the class's prefix so
/// any class write also refreshes its schedule.
pub struct ClassSchedules;

impl ClassSchedules {
    pub fn key(class_id: &ClassId) -> QueryKey {
        QueryKey::new(Classes::NAME).path(class_id).path("schedules")
    }

    pub fn read(api: &ApiClient, cache: &QueryCache, class_id: &ClassId) -> QueryState<Vec<ClassSchedule>> {
        let api = api.clone();
        let id = class_id.clone();
        cache.read(&Self::key(class_id), move || async move {
            let mut slots = api.list_class_schedules(&id).await?;
            slots.sort_by(|a, b| {
                (a.day_of_week, a.start_time.as_str()).cmp(&(b.day_of_week, b.start_time.as_str()))
            });
            Ok(slots)
        })
    }

    pub fn create(api: &ApiClient, cache: &QueryCache) -> Mutation<(ClassId, ScheduleInput), ClassSchedule> {
        let api = api.clone();
        Mutation::new(
            cache.clone(),
            "add",
            "schedule",
            move |(id, input): (ClassId, ScheduleInput)| {
                let api = api.clone();
                async move { api.create_class_schedule(&id, &input).await }
            },
        )
        .invalidates(QueryKey::new(Classes::NAME))
    }

    pub fn delete(api: &ApiClient, cache: &QueryCache) -> Mutation<(ClassId, ScheduleId), ()> {
        let api = api.clone();
        Mutation::new(
            cache.clone(),
            "delete",
            "schedule",
            move |(id, schedule): (ClassId, ScheduleId)| {
                let api = api.clone();
                async move { api.delete_class_schedule(&id, &schedule).await }
            },
        )
        .invalidates(QueryKey::new(Classes::NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_key_is_under_class_prefix() {
        let key = ClassSchedules::key(&ClassId::from("c-9"));
        assert_eq!(key.to_string(), "classes/c-9/schedules");
        assert!(key.starts_with(&Classes::key()));
    }

    #[test]
    fn draft_collects_selected_ids() {
        let mut draft = ClassDraft::default();
        draft.set_field("name", "9B Science").unwrap();
        draft.student_ids.toggle(StudentId::from("s2"));
        draft.student_ids.toggle(StudentId::from("s1"));
        draft.teacher_ids.toggle(TeacherId::from("t1"));
        let input = draft.to_input().unwrap();
        assert_eq!(input.student_ids, vec![StudentId::from("s1"), StudentId::from("s2")]);
        assert_eq!(input.teacher_ids.len(), 1);
        assert_eq!(input.subject, None);
    }
}
