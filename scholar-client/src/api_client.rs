//! REST facade over the Scholar API.
//!
//! One typed method per endpoint. Every request carries the session's bearer
//! token when one exists; a 401 on an authenticated call clears the session
//! and surfaces as [`ApiClientError::Unauthorized`].

use crate::config::ClientConfig;
use crate::error::ApiClientError;
use crate::session::{Session, SessionService};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use scholar_core::{
    Activity, ActivityFilter, ActivityId, ActivityInput, ApiErrorBody, AssignStudentsRequest,
    Assignment, AssignmentFilter, AssignmentId, AssignmentInput, ClassFilter, ClassId, ClassInput,
    ClassSchedule, CurriculumAnalysis, DashboardOverview, DiagnosticFilter, DiagnosticResult,
    DiagnosticTest, DiagnosticTestId, DiagnosticTestInput, GenerateActivityRequest,
    GenerateReportRequest, ImportSummary, Intervention, InterventionFilter, InterventionId,
    InterventionInput, LoginRequest, LoginResponse, Note, NoteFilter, NoteId, NoteInput,
    PerformanceSlice, Report, ReportId, ScheduleId, ScheduleInput, SchoolClass, SessionUser,
    Student, StudentFilter, StudentId, StudentInput, Teacher, TeacherFilter, TeacherId,
    TeacherInput, Topic, TopicFilter, TopicId, TopicInput, UploadedAsset, YearGroup,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// An attached file for multipart uploads.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime,
            bytes,
        }
    }

    fn into_part(self) -> Result<Part, ApiClientError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.mime)?)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    upload_timeout: Duration,
    session: SessionService,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionService) -> Result<Self, ApiClientError> {
        config
            .validate()
            .map_err(|e| ApiClientError::Config(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            upload_timeout: Duration::from_millis(config.upload_timeout_ms),
            session,
        })
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Sign in and publish the new session.
    ///
    /// A 401 here means bad credentials, so it is reported with the server's
    /// message instead of triggering the session teardown.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ApiClientError> {
        let builder = self
            .client
            .post(self.url("/auth/login"))
            .json(request);
        let response: LoginResponse = self.send(builder, &Method::POST, "/auth/login", false).await?;
        let session = Session::from(response);
        self.session
            .set(session.clone())
            .map_err(|e| ApiClientError::Config(format!("failed to persist session: {e}")))?;
        Ok(session)
    }

    /// Best-effort server logout; the local session is cleared regardless.
    pub async fn logout(&self) -> Result<(), ApiClientError> {
        let builder = self.request(Method::POST, "/auth/logout");
        let result = self
            .send_raw(builder, &Method::POST, "/auth/logout", true)
            .await
            .map(drop);
        if let Err(err) = &result {
            tracing::debug!(error = %err, "server logout failed, clearing local session anyway");
        }
        if let Err(err) = self.session.clear() {
            tracing::warn!(error = %err, "failed to remove persisted session");
        }
        match result {
            Err(ApiClientError::Unauthorized) => Ok(()),
            other => other,
        }
    }

    pub async fn me(&self) -> Result<SessionUser, ApiClientError> {
        self.get_json::<SessionUser, ()>("/auth/me", None).await
    }

    // ------------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------------

    pub async fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, ApiClientError> {
        self.get_list("/students", Some(filter)).await
    }

    pub async fn get_student(&self, id: &StudentId) -> Result<Student, ApiClientError> {
        self.get_json::<Student, ()>(&format!("/students/{id}"), None).await
    }

    pub async fn create_student(&self, input: &StudentInput) -> Result<Student, ApiClientError> {
        self.post_json("/students", input).await
    }

    pub async fn update_student(
        &self,
        id: &StudentId,
        input: &StudentInput,
    ) -> Result<Student, ApiClientError> {
        self.put_json(&format!("/students/{id}"), input).await
    }

    pub async fn delete_student(&self, id: &StudentId) -> Result<(), ApiClientError> {
        self.delete(&format!("/students/{id}")).await
    }

    /// Bulk import from a CSV file.
    pub async fn import_students(&self, file: Upload) -> Result<ImportSummary, ApiClientError> {
        let form = Form::new().part("file", file.into_part()?);
        self.post_multipart("/students/import", form).await
    }

    pub async fn upload_student_avatar(
        &self,
        id: &StudentId,
        image: Upload,
    ) -> Result<UploadedAsset, ApiClientError> {
        let form = Form::new().part("avatar", image.into_part()?);
        self.post_multipart(&format!("/students/{id}/avatar"), form)
            .await
    }

    pub async fn list_year_groups(&self) -> Result<Vec<YearGroup>, ApiClientError> {
        self.get_list::<YearGroup, ()>("/year-groups", None).await
    }

    // ------------------------------------------------------------------------
    // Classes and schedules
    // ------------------------------------------------------------------------

    pub async fn list_classes(&self, filter: &ClassFilter) -> Result<Vec<SchoolClass>, ApiClientError> {
        self.get_list("/classes", Some(filter)).await
    }

    pub async fn get_class(&self, id: &ClassId) -> Result<SchoolClass, ApiClientError> {
        self.get_json::<SchoolClass, ()>(&format!("/classes/{id}"), None)
            .await
    }

    pub async fn create_class(&self, input: &ClassInput) -> Result<SchoolClass, ApiClientError> {
        self.post_json("/classes", input).await
    }

    pub async fn update_class(
        &self,
        id: &ClassId,
        input: &ClassInput,
    ) -> Result<SchoolClass, ApiClientError> {
        self.put_json(&format!("/classes/{id}"), input).await
    }

    pub async fn delete_class(&self, id: &ClassId) -> Result<(), ApiClientError> {
        self.delete(&format!("/classes/{id}")).await
    }

    pub async fn assign_students(
        &self,
        id: &ClassId,
        student_ids: &[StudentId],
    ) -> Result<SchoolClass, ApiClientError> {
        let body = AssignStudentsRequest {
            student_ids: student_ids.to_vec(),
        };
        self.post_json(&format!("/classes/{id}/students"), &body)
            .await
    }

    pub async fn remove_student_from_class(
        &self,
        id: &ClassId,
        student_id: &StudentId,
    ) -> Result<(), ApiClientError> {
        self.delete(&format!("/classes/{id}/students/{student_id}"))
            .await
    }

    pub async fn list_class_schedules(&self, id: &ClassId) -> Result<Vec<ClassSchedule>, ApiClientError> {
        self.get_list::<ClassSchedule, ()>(&format!("/classes/{id}/schedules"), None)
            .await
    }

    pub async fn create_class_schedule(
        &self,
        id: &ClassId,
        input: &ScheduleInput,
    ) -> Result<ClassSchedule, ApiClientError> {
        self.post_json(&format!("/classes/{id}/schedules"), input)
            .await
    }

    pub async fn delete_class_schedule(
        &self,
        id: &ClassId,
        schedule_id: &ScheduleId,
    ) -> Result<(), ApiClientError> {
        self.delete(&format!("/classes/{id}/schedules/{schedule_id}"))
            .await
    }

    // ------------------------------------------------------------------------
    // Teachers
    // ------------------------------------------------------------------------

    pub async fn list_teachers(&self, filter: &TeacherFilter) -> Result<Vec<Teacher>, ApiClientError> {
        self.get_list("/teachers", Some(filter)).await
    }

    pub async fn create_teacher(&self, input: &TeacherInput) -> Result<Teacher, ApiClientError> {
        self.post_json("/teachers", input).await
    }

    pub async fn update_teacher(
        &self,
        id: &TeacherId,
        input: &TeacherInput,
    ) -> Result<Teacher, ApiClientError> {
        self.put_json(&format!("/teachers/{id}"), input).await
    }

    pub async fn delete_teacher(&self, id: &TeacherId) -> Result<(), ApiClientError> {
        self.delete(&format!("/teachers/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Curriculum
    // ------------------------------------------------------------------------

    pub async fn list_topics(&self, filter: &TopicFilter) -> Result<Vec<Topic>, ApiClientError> {
        self.get_list("/curriculum/topics", Some(filter)).await
    }

    pub async fn create_topic(&self, input: &TopicInput) -> Result<Topic, ApiClientError> {
        self.post_json("/curriculum/topics", input).await
    }

    pub async fn update_topic(&self, id: &TopicId, input: &TopicInput) -> Result<Topic, ApiClientError> {
        self.put_json(&format!("/curriculum/topics/{id}"), input)
            .await
    }

    pub async fn delete_topic(&self, id: &TopicId) -> Result<(), ApiClientError> {
        self.delete(&format!("/curriculum/topics/{id}")).await
    }

    /// Upload a curriculum PDF for server-side analysis. Uses the extended
    /// upload timeout.
    pub async fn upload_curriculum(&self, pdf: Upload) -> Result<CurriculumAnalysis, ApiClientError> {
        let form = Form::new().part("file", pdf.into_part()?);
        self.post_multipart("/curriculum/upload", form).await
    }

    pub async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, ApiClientError> {
        self.get_list("/curriculum/activities", Some(filter)).await
    }

    pub async fn get_activity(&self, id: &ActivityId) -> Result<Activity, ApiClientError> {
        self.get_json::<Activity, ()>(&format!("/curriculum/activities/{id}"), None)
            .await
    }

    pub async fn generate_activity(
        &self,
        request: &GenerateActivityRequest,
    ) -> Result<Activity, ApiClientError> {
        self.post_json("/curriculum/activities/generate", request)
            .await
    }

    pub async fn update_activity(
        &self,
        id: &ActivityId,
        input: &ActivityInput,
    ) -> Result<Activity, ApiClientError> {
        self.put_json(&format!("/curriculum/activities/{id}"), input)
            .await
    }

    pub async fn delete_activity(&self, id: &ActivityId) -> Result<(), ApiClientError> {
        self.delete(&format!("/curriculum/activities/{id}")).await
    }

    pub async fn approve_activity(&self, id: &ActivityId) -> Result<Activity, ApiClientError> {
        self.post_empty(&format!("/curriculum/activities/{id}/approve"))
            .await
    }

    // ------------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------------

    pub async fn list_assignments(
        &self,
        filter: &AssignmentFilter,
    ) -> Result<Vec<Assignment>, ApiClientError> {
        self.get_list("/assignments", Some(filter)).await
    }

    pub async fn create_assignment(&self, input: &AssignmentInput) -> Result<Assignment, ApiClientError> {
        self.post_json("/assignments", input).await
    }

    pub async fn update_assignment(
        &self,
        id: &AssignmentId,
        input: &AssignmentInput,
    ) -> Result<Assignment, ApiClientError> {
        self.put_json(&format!("/assignments/{id}"), input).await
    }

    pub async fn delete_assignment(&self, id: &AssignmentId) -> Result<(), ApiClientError> {
        self.delete(&format!("/assignments/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Diagnostic tests
    // ------------------------------------------------------------------------

    pub async fn list_diagnostic_tests(
        &self,
        filter: &DiagnosticFilter,
    ) -> Result<Vec<DiagnosticTest>, ApiClientError> {
        self.get_list("/diagnostic-tests", Some(filter)).await
    }

    pub async fn get_diagnostic_test(&self, id: &DiagnosticTestId) -> Result<DiagnosticTest, ApiClientError> {
        self.get_json::<DiagnosticTest, ()>(&format!("/diagnostic-tests/{id}"), None)
            .await
    }

    pub async fn create_diagnostic_test(
        &self,
        input: &DiagnosticTestInput,
    ) -> Result<DiagnosticTest, ApiClientError> {
        self.post_json("/diagnostic-tests", input).await
    }

    pub async fn update_diagnostic_test(
        &self,
        id: &DiagnosticTestId,
        input: &DiagnosticTestInput,
    ) -> Result<DiagnosticTest, ApiClientError> {
        self.put_json(&format!("/diagnostic-tests/{id}"), input)
            .await
    }

    pub async fn delete_diagnostic_test(&self, id: &DiagnosticTestId) -> Result<(), ApiClientError> {
        self.delete(&format!("/diagnostic-tests/{id}")).await
    }

    /// Per-student results, including server-detected skill gaps.
    pub async fn diagnostic_results(
        &self,
        id: &DiagnosticTestId,
    ) -> Result<Vec<DiagnosticResult>, ApiClientError> {
        self.get_list::<DiagnosticResult, ()>(&format!("/diagnostic-tests/{id}/results"), None)
            .await
    }

    // ------------------------------------------------------------------------
    // Interventions and notes
    // ------------------------------------------------------------------------

    pub async fn list_interventions(
        &self,
        filter: &InterventionFilter,
    ) -> Result<Vec<Intervention>, ApiClientError> {
        self.get_list("/interventions", Some(filter)).await
    }

    pub async fn create_intervention(
        &self,
        input: &InterventionInput,
    ) -> Result<Intervention, ApiClientError> {
        self.post_json("/interventions", input).await
    }

    pub async fn update_intervention(
        &self,
        id: &InterventionId,
        input: &InterventionInput,
    ) -> Result<Intervention, ApiClientError> {
        self.put_json(&format!("/interventions/{id}"), input).await
    }

    pub async fn delete_intervention(&self, id: &InterventionId) -> Result<(), ApiClientError> {
        self.delete(&format!("/interventions/{id}")).await
    }

    pub async fn complete_intervention(&self, id: &InterventionId) -> Result<Intervention, ApiClientError> {
        self.post_empty(&format!("/interventions/{id}/complete"))
            .await
    }

    pub async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, ApiClientError> {
        self.get_list("/notes", Some(filter)).await
    }

    pub async fn create_note(&self, input: &NoteInput) -> Result<Note, ApiClientError> {
        self.post_json("/notes", input).await
    }

    pub async fn update_note(&self, id: &NoteId, input: &NoteInput) -> Result<Note, ApiClientError> {
        self.put_json(&format!("/notes/{id}"), input).await
    }

    pub async fn delete_note(&self, id: &NoteId) -> Result<(), ApiClientError> {
        self.delete(&format!("/notes/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------------

    pub async fn list_reports(&self) -> Result<Vec<Report>, ApiClientError> {
        self.get_list::<Report, ()>("/reports", None).await
    }

    pub async fn generate_report(&self, request: &GenerateReportRequest) -> Result<Report, ApiClientError> {
        self.post_json("/reports/generate", request).await
    }

    pub async fn delete_report(&self, id: &ReportId) -> Result<(), ApiClientError> {
        self.delete(&format!("/reports/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------------

    pub async fn dashboard_overview(&self) -> Result<DashboardOverview, ApiClientError> {
        self.get_json::<DashboardOverview, ()>("/dashboard/overview", None)
            .await
    }

    pub async fn dashboard_performance(&self) -> Result<Vec<PerformanceSlice>, ApiClientError> {
        self.get_list::<PerformanceSlice, ()>("/dashboard/performance", None)
            .await
    }

    pub async fn recent_activities(&self) -> Result<Vec<Activity>, ApiClientError> {
        self.get_list::<Activity, ()>("/dashboard/recent-activities", None)
            .await
    }

    pub async fn active_interventions(&self) -> Result<Vec<Intervention>, ApiClientError> {
        self.get_list::<Intervention, ()>("/dashboard/interventions", None)
            .await
    }

    // ------------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut builder = self.request(Method::GET, path);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        self.send(builder, &Method::GET, path, true).await
    }

    /// Lists tolerate `null` and empty bodies.
    async fn get_list<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<Vec<T>, ApiClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let items: Option<Vec<T>> = self.get_json(path, query).await?;
        Ok(items.unwrap_or_default())
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.send(builder, &Method::POST, path, true).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let builder = self.request(Method::POST, path);
        self.send(builder, &Method::POST, path, true).await
    }

    async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(builder, &Method::PUT, path, true).await
    }

    /// Whatever the server echoes back on a delete is discarded.
    async fn delete(&self, path: &str) -> Result<(), ApiClientError> {
        let builder = self.request(Method::DELETE, path);
        self.send_raw(builder, &Method::DELETE, path, true)
            .await
            .map(drop)
    }

    async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiClientError> {
        let builder = self
            .request(Method::POST, path)
            .timeout(self.upload_timeout)
            .multipart(form);
        self.send(builder, &Method::POST, path, true).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
        authenticated: bool,
    ) -> Result<T, ApiClientError> {
        let text = self.send_raw(builder, method, path, authenticated).await?;
        decode_body(&text)
    }

    /// Successful responses come back as raw text.
    async fn send_raw(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
        authenticated: bool,
    ) -> Result<String, ApiClientError> {
        tracing::debug!(%method, path, "api request");
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(%method, path, timeout = err.is_timeout(), error = %err, "api request failed");
            ApiClientError::Transport(err)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        if status.as_u16() == 401 && authenticated {
            tracing::info!(%method, path, "received 401, clearing session");
            if let Err(err) = self.session.clear() {
                tracing::warn!(error = %err, "failed to remove persisted session");
            }
            return Err(ApiClientError::Unauthorized);
        }

        let err = classify(status.as_u16(), &text);
        tracing::debug!(%method, path, status = status.as_u16(), error = %err, "api request rejected");
        Err(err)
    }
}

/// Empty bodies (204, or a 200 with nothing in it) decode as JSON `null`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiClientError> {
    let text = text.trim();
    let text = if text.is_empty() { "null" } else { text };
    Ok(serde_json::from_str(text)?)
}

fn classify(status: u16, body: &str) -> ApiClientError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    match status {
        400..=499 => match message {
            Some(message) => ApiClientError::Validation { status, message },
            None => ApiClientError::Rejected { status },
        },
        _ => ApiClientError::Server { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_splits_client_and_server_errors() {
        assert!(matches!(
            classify(422, r#"{"message":"First name is required"}"#),
            ApiClientError::Validation { status: 422, ref message } if message == "First name is required"
        ));
        assert!(matches!(classify(404, "not json"), ApiClientError::Rejected { status: 404 }));
        assert!(matches!(classify(400, r#"{"message":"  "}"#), ApiClientError::Rejected { .. }));
        assert!(matches!(
            classify(503, r#"{"message":"db down"}"#),
            ApiClientError::Server { status: 503, .. }
        ));
    }

    #[test]
    fn empty_body_decodes_as_null() {
        decode_body::<()>("").unwrap();
        let list: Option<Vec<u32>> = decode_body("null").unwrap();
        assert!(list.is_none());
        let list: Option<Vec<u32>> = decode_body("[1]").unwrap();
        assert_eq!(list, Some(vec![1]));
    }
}
