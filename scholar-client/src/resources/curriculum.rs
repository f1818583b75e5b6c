use super::{keys, non_empty, non_empty_id, opt_id, opt_str, parse_field, ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::{ApiClient, Upload};
use crate::display::format_date;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField};
use crate::mutation::Mutation;
use crate::query::{QueryCache, QueryKey};
use futures_util::future::BoxFuture;
use scholar_core::{
    Activity, ActivityFilter, ActivityId, ActivityInput, ActivityKind, ActivityStatus,
    CurriculumAnalysis, Difficulty, GenerateActivityRequest, Topic, TopicFilter, TopicId,
    TopicInput,
};

pub struct Topics;

impl Resource for Topics {
    const NAME: &'static str = "topics";
    const LABEL: &'static str = "topic";
    const TITLE: &'static str = "Curriculum";
    const EMPTY_MESSAGE: &'static str = "No topics yet. Upload a curriculum PDF to get started";

    type Id = TopicId;
    type Item = Topic;
    type Draft = TopicDraft;

    fn id(item: &Topic) -> TopicId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("search", "Search"),
            FilterField::new("subject", "Subject"),
            FilterField::new("yearGroupId", "Year group"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["topics", "activities"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Topic>>> {
        Box::pin(async move {
            let filter = TopicFilter {
                search: filters.value("search"),
                subject: filters.value("subject"),
                year_group_id: filters.value("yearGroupId"),
            };
            let mut topics = api.list_topics(&filter).await?;
            topics.sort_by_key(|t| t.position);
            Ok(topics)
        })
    }

    fn create(api: ApiClient, input: TopicInput) -> BoxFuture<'static, ApiResult<Topic>> {
        Box::pin(async move { api.create_topic(&input).await })
    }

    fn update(api: ApiClient, id: TopicId, input: TopicInput) -> BoxFuture<'static, ApiResult<Topic>> {
        Box::pin(async move { api.update_topic(&id, &input).await })
    }

    fn delete(api: ApiClient, id: TopicId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_topic(&id).await })
    }
}

impl Topics {
    /// PDF analysis creates topics server-side; this can take minutes.
    pub fn upload(api: &ApiClient, cache: &QueryCache) -> Mutation<Upload, CurriculumAnalysis> {
        let api = api.clone();
        Mutation::new(cache.clone(), "upload", "curriculum", move |pdf: Upload| {
            let api = api.clone();
            async move { api.upload_curriculum(pdf).await }
        })
        .invalidates_all(Self::affected())
    }
}

impl ListRow for Topic {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("#", 6),
            Column::new("Title", 44),
            Column::new("Subject", 30),
            Column::new("Year", 20),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            self.title.clone(),
            self.subject.clone(),
            opt_id(&self.year_group_id),
        ]
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicDraft {
    pub title: String,
    pub subject: String,
    pub year_group_id: String,
    pub description: String,
    pub position: u32,
}

impl Draft for TopicDraft {
    type Entity = Topic;
    type Id = TopicId;
    type Input = TopicInput;

    fn from_entity(topic: &Topic) -> Self {
        Self {
            title: topic.title.clone(),
            subject: topic.subject.clone(),
            year_group_id: opt_id(&topic.year_group_id),
            description: opt_str(&topic.description),
            position: topic.position,
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("title", "Title", self.title.clone()),
            FormField::required("subject", "Subject", self.subject.clone()),
            FormField::optional("yearGroupId", "Year group", self.year_group_id.clone()),
            FormField::optional("description", "Description", self.description.clone()),
            FormField::optional("position", "Position", self.position.to_string()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "title" => self.title = value.to_string(),
            "subject" => self.subject = value.to_string(),
            "yearGroupId" => self.year_group_id = value.to_string(),
            "description" => self.description = value.to_string(),
            "position" if value.trim().is_empty() => self.position = 0,
            "position" => self.position = parse_field("Position", value)?,
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<TopicInput, FormError> {
        Ok(TopicInput {
            title: self.title.trim().to_string(),
            subject: self.subject.trim().to_string(),
            year_group_id: non_empty_id(&self.year_group_id),
            description: non_empty(&self.description),
            position: self.position,
        })
    }
}

/// AI-generated activities. Creating one asks the server to generate it;
/// editing saves manual changes. New activities start as drafts and must be
/// approved before they can be assigned.
pub struct Activities;

impl Resource for Activities {
    const NAME: &'static str = "activities";
    const LABEL: &'static str = "activity";
    const TITLE: &'static str = "Activities";
    const EMPTY_MESSAGE: &'static str = "No activities match the current filters";
    const SECONDARY: Option<&'static str> = Some("Approve");

    type Id = ActivityId;
    type Item = Activity;
    type Draft = ActivityDraft;

    fn id(item: &Activity) -> ActivityId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::new("topicId", "Topic"),
            FilterField::new("status", "Status"),
            FilterField::new("kind", "Type"),
        ];
        FILTERS
    }

    fn affected() -> Vec<QueryKey> {
        keys(&["activities", "dashboard"])
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Activity>>> {
        Box::pin(async move {
            let filter = ActivityFilter {
                topic_id: filters.value("topicId"),
                status: filters.parsed("status"),
                kind: filters.parsed("kind"),
            };
            api.list_activities(&filter).await
        })
    }

    fn create(api: ApiClient, draft: ActivityDraft) -> BoxFuture<'static, ApiResult<Activity>> {
        Box::pin(async move { api.generate_activity(&draft.generate_request()).await })
    }

    fn update(api: ApiClient, id: ActivityId, draft: ActivityDraft) -> BoxFuture<'static, ApiResult<Activity>> {
        Box::pin(async move { api.update_activity(&id, &draft.edit_input()).await })
    }

    fn delete(api: ApiClient, id: ActivityId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_activity(&id).await })
    }

    fn secondary(api: ApiClient, id: ActivityId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.approve_activity(&id).await.map(|_| ()) })
    }
}

impl ListRow for Activity {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Title", 34),
            Column::new("Topic", 22),
            Column::new("Type", 12),
            Column::new("Level", 12),
            Column::new("Status", 10),
            Column::new("Created", 10),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.topic_title
                .clone()
                .unwrap_or_else(|| self.topic_id.to_string()),
            self.kind.to_string(),
            self.difficulty.to_string(),
            self.status.to_string(),
            format_date(self.created_at),
        ]
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

/// One draft serves both flows: create sends the generation request, edit
/// sends the manual changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityDraft {
    pub topic_id: String,
    pub title: String,
    pub kind: ActivityKind,
    pub difficulty: Difficulty,
    pub content: String,
    pub instructions: String,
    pub status: ActivityStatus,
}

impl ActivityDraft {
    pub fn generate_request(&self) -> GenerateActivityRequest {
        GenerateActivityRequest {
            topic_id: TopicId::from(self.topic_id.trim()),
            kind: self.kind,
            difficulty: self.difficulty,
            instructions: non_empty(&self.instructions),
        }
    }

    pub fn edit_input(&self) -> ActivityInput {
        ActivityInput {
            title: self.title.trim().to_string(),
            kind: self.kind,
            difficulty: self.difficulty,
            content: self.content.clone(),
        }
    }
}

impl Draft for ActivityDraft {
    type Entity = Activity;
    type Id = ActivityId;
    type Input = ActivityDraft;

    fn from_entity(activity: &Activity) -> Self {
        Self {
            topic_id: activity.topic_id.to_string(),
            title: activity.title.clone(),
            kind: activity.kind,
            difficulty: activity.difficulty,
            content: activity.content.clone(),
            instructions: String::new(),
            status: activity.status,
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("topicId", "Topic", self.topic_id.clone()),
            FormField::optional("title", "Title", self.title.clone()),
            FormField::required("kind", "Type", self.kind.to_string()),
            FormField::required("difficulty", "Difficulty", self.difficulty.to_string()),
            FormField::optional("instructions", "Instructions", self.instructions.clone()),
            FormField::optional("content", "Content", self.content.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "topicId" => self.topic_id = value.to_string(),
            "title" => self.title = value.to_string(),
            "kind" => self.kind = parse_field("Type", value)?,
            "difficulty" => self.difficulty = parse_field("Difficulty", value)?,
            "instructions" => self.instructions = value.to_string(),
            "content" => self.content = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<ActivityDraft, FormError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_maps_to_generate_and_edit_bodies() {
        let mut draft = ActivityDraft::default();
        draft.set_field("topicId", " t-4 ").unwrap();
        draft.set_field("kind", "quiz").unwrap();
        draft.set_field("difficulty", "hard").unwrap();
        draft.set_field("title", "Fractions quiz").unwrap();

        let generate = draft.generate_request();
        assert_eq!(generate.topic_id, TopicId::from("t-4"));
        assert_eq!(generate.kind, ActivityKind::Quiz);
        assert_eq!(generate.difficulty, Difficulty::Extension);
        assert_eq!(generate.instructions, None);
        assert_eq!(draft.edit_input().title, "Fractions quiz");
    }

    #[test]
    fn bad_enum_input_is_reported_against_the_field() {
        let mut draft = ActivityDraft::default();
        let err = draft.set_field("kind", "essay").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Type: Invalid activity kind: essay");
    }

    #[test]
    fn topic_position_must_be_numeric() {
        let mut draft = TopicDraft::default();
        assert!(draft.set_field("position", "third").is_err());
        draft.set_field("position", "3").unwrap();
        assert_eq!(draft.position, 3);
    }
}
