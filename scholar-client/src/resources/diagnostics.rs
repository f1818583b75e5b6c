use super::{non_empty_id, opt_id, parse_field, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::display::{format_date, format_percent};
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField, Selection};
use crate::query::{QueryCache, QueryKey, QueryState};
use futures_util::future::BoxFuture;
use scholar_core::{
    DiagnosticFilter, DiagnosticResult, DiagnosticTest, DiagnosticTestId, DiagnosticTestInput,
    TopicId,
};

pub struct Diagnostics;

impl Resource for Diagnostics {
    const NAME: &'static str = "diagnostic-tests";
    const LABEL: &'static str = "diagnostic test";
    const TITLE: &'static str = "Diagnostics";
    const EMPTY_MESSAGE: &'static str = "No diagnostic tests yet";

    type Id = DiagnosticTestId;
    type Item = DiagnosticTest;
    type Draft = DiagnosticDraft;

    fn id(item: &DiagnosticTest) -> DiagnosticTestId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("classId", "Class"),
            FilterField::new("topicId", "Topic"),
        ];
        FILTERS
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<DiagnosticTest>>> {
        Box::pin(async move {
            let filter = DiagnosticFilter {
                class_id: filters.value("classId"),
                topic_id: filters.value("topicId"),
            };
            api.list_diagnostic_tests(&filter).await
        })
    }

    fn create(api: ApiClient, input: DiagnosticTestInput) -> BoxFuture<'static, ApiResult<DiagnosticTest>> {
        Box::pin(async move { api.create_diagnostic_test(&input).await })
    }

    fn update(
        api: ApiClient,
        id: DiagnosticTestId,
        input: DiagnosticTestInput,
    ) -> BoxFuture<'static, ApiResult<DiagnosticTest>> {
        Box::pin(async move { api.update_diagnostic_test(&id, &input).await })
    }

    fn delete(api: ApiClient, id: DiagnosticTestId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_diagnostic_test(&id).await })
    }
}

impl ListRow for DiagnosticTest {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Title", 36),
            Column::new("Class", 16),
            Column::new("Questions", 12),
            Column::new("Created", 16),
            Column::new("Average", 20),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            opt_id(&self.class_id),
            self.question_count.to_string(),
            format_date(self.created_at),
            format_percent(self.average_score),
        ]
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn score(&self) -> Option<f64> {
        self.average_score
    }

    fn score_column() -> Option<usize> {
        Some(4)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticDraft {
    pub title: String,
    pub class_id: String,
    pub topic_ids: Selection<TopicId>,
    pub question_count: u32,
}

impl Default for DiagnosticDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            class_id: String::new(),
            topic_ids: Selection::default(),
            question_count: 10,
        }
    }
}

impl Draft for DiagnosticDraft {
    type Entity = DiagnosticTest;
    type Id = DiagnosticTestId;
    type Input = DiagnosticTestInput;

    fn from_entity(test: &DiagnosticTest) -> Self {
        Self {
            title: test.title.clone(),
            class_id: opt_id(&test.class_id),
            topic_ids: test.topic_ids.iter().cloned().collect(),
            question_count: test.question_count,
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("title", "Title", self.title.clone()),
            FormField::optional("classId", "Class", self.class_id.clone()),
            FormField::optional("topicIds", "Topics", self.topic_ids.to_csv()),
            FormField::required("questionCount", "Questions", self.question_count.to_string()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "title" => self.title = value.to_string(),
            "classId" => self.class_id = value.to_string(),
            "topicIds" => self.topic_ids = Selection::from_csv(value),
            "questionCount" => self.question_count = parse_field("Questions", value)?,
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<DiagnosticTestInput, FormError> {
        if self.question_count == 0 {
            return Err(FormError::Invalid {
                label: "Questions",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(DiagnosticTestInput {
            title: self.title.trim().to_string(),
            class_id: non_empty_id(&self.class_id),
            topic_ids: self.topic_ids.to_vec(),
            question_count: self.question_count,
        })
    }
}

/// Per-student results of one test, lowest score first so students who
/// need support are at the top.
pub struct DiagnosticResults;

impl DiagnosticResults {
    pub fn key(test_id: &DiagnosticTestId) -> QueryKey {
        QueryKey::new(Diagnostics::NAME).path(test_id).path("results")
    }

    pub fn read(
        api: &ApiClient,
        cache: &QueryCache,
        test_id: &DiagnosticTestId,
    ) -> QueryState<Vec<DiagnosticResult>> {
        let api = api.clone();
        let id = test_id.clone();
        cache.read(&Self::key(test_id), move || async move {
            let mut results = api.diagnostic_results(&id).await?;
            results.sort_by(|a, b| a.score.total_cmp(&b.score));
            Ok(results)
        })
    }
}

impl ListRow for DiagnosticResult {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Student", 30),
            Column::new("Score", 15),
            Column::new("Skill gaps", 55),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_name
                .clone()
                .unwrap_or_else(|| self.student_id.to_string()),
            format_percent(Some(self.score)),
            self.skill_gaps.join(", "),
        ]
    }

    fn title(&self) -> String {
        self.student_name
            .clone()
            .unwrap_or_else(|| self.student_id.to_string())
    }

    fn score(&self) -> Option<f64> {
        Some(self.score)
    }

    fn score_column() -> Option<usize> {
        Some(1)
    }
}
