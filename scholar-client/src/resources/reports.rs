use super::{non_empty, parse_field, ApiResult, Column, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::display::format_date;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField};
use futures_util::future::BoxFuture;
use scholar_core::{GenerateReportRequest, Report, ReportId, ReportKind};

/// Generated reports. They cannot be edited, only generated and deleted.
pub struct Reports;

impl Resource for Reports {
    const NAME: &'static str = "reports";
    const LABEL: &'static str = "report";
    const TITLE: &'static str = "Reports";
    const EMPTY_MESSAGE: &'static str = "No reports generated yet";
    const EDITABLE: bool = false;

    type Id = ReportId;
    type Item = Report;
    type Draft = ReportDraft;

    fn id(item: &Report) -> ReportId {
        item.id.clone()
    }

    fn list(api: ApiClient, _filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Report>>> {
        Box::pin(async move { api.list_reports().await })
    }

    fn create(api: ApiClient, request: GenerateReportRequest) -> BoxFuture<'static, ApiResult<Report>> {
        Box::pin(async move { api.generate_report(&request).await })
    }

    fn delete(api: ApiClient, id: ReportId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_report(&id).await })
    }
}

impl ListRow for Report {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Title", 40),
            Column::new("Scope", 15),
            Column::new("Status", 15),
            Column::new("Created", 30),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.kind.to_string(),
            self.status.to_string(),
            format_date(self.created_at),
        ]
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub kind: ReportKind,
    /// Student, class or year-group id depending on `kind`.
    pub subject_id: String,
    pub period: String,
}

impl Draft for ReportDraft {
    type Entity = Report;
    type Id = ReportId;
    type Input = GenerateReportRequest;

    fn from_entity(report: &Report) -> Self {
        Self {
            title: report.title.clone(),
            kind: report.kind,
            ..Self::default()
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("title", "Title", self.title.clone()),
            FormField::required("kind", "Scope", self.kind.to_string()),
            FormField::required("subjectId", "For (id)", self.subject_id.clone()),
            FormField::optional("period", "Period", self.period.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "title" => self.title = value.to_string(),
            "kind" => self.kind = parse_field("Scope", value)?,
            "subjectId" => self.subject_id = value.to_string(),
            "period" => self.period = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<GenerateReportRequest, FormError> {
        Ok(GenerateReportRequest {
            title: self.title.trim().to_string(),
            kind: self.kind,
            subject_id: self.subject_id.trim().to_string(),
            period: non_empty(&self.period),
        })
    }
}
