//! Page extras that do not fit the create/edit/delete form: file uploads,
//! roster and timetable edits, and the sub-lists shown under a row's
//! details.

use crate::input::TextFields;
use chrono::NaiveTime;
use futures_util::future::BoxFuture;
use scholar_client::resources::{ClassSchedules, Classes, DiagnosticResults, Students, Topics, YearGroups};
use scholar_client::{render_decision, ApiClient, ListRender, ListRow, QueryCache, QueryState, Upload};
use scholar_core::{
    ClassId, DayOfWeek, DiagnosticTestId, ImportSummary, ScheduleId, ScheduleInput, StudentId,
    TopicId,
};
use std::collections::HashMap;
use std::path::Path;

/// Success or failure message for the notification bar.
pub type ToolResult = Result<String, String>;

pub type ToolValues = HashMap<&'static str, String>;

type Run<Id> = Box<dyn Fn(Option<Id>, ToolValues) -> BoxFuture<'static, ToolResult> + Send + Sync>;

pub struct Tool<Id> {
    pub label: &'static str,
    /// Acts on the selected row.
    pub needs_row: bool,
    prompt: fn() -> TextFields,
    run: Run<Id>,
}

impl<Id> Tool<Id> {
    pub fn new<F>(label: &'static str, needs_row: bool, prompt: fn() -> TextFields, run: F) -> Self
    where
        F: Fn(Option<Id>, ToolValues) -> BoxFuture<'static, ToolResult> + Send + Sync + 'static,
    {
        Self {
            label,
            needs_row,
            prompt,
            run: Box::new(run),
        }
    }

    pub fn prompt(&self) -> TextFields {
        (self.prompt)()
    }

    pub fn run(&self, target: Option<Id>, values: ToolValues) -> BoxFuture<'static, ToolResult> {
        (self.run)(target, values)
    }
}

/// An open tool prompt: which tool, which row, and the typed buffers.
pub struct ToolPrompt<Id> {
    pub index: usize,
    pub target: Option<Id>,
    pub inputs: TextFields,
}

impl<Id> ToolPrompt<Id> {
    pub fn values(&self) -> ToolValues {
        self.inputs
            .values()
            .map(|(name, value)| (name, value.trim().to_string()))
            .collect()
    }
}

type Lines<Id> = Box<dyn Fn(&Id) -> Result<Vec<String>, String> + Send + Sync>;

/// A related list drawn under the detail panel of the viewed row.
pub struct DetailSection<Id> {
    pub title: &'static str,
    lines: Lines<Id>,
}

impl<Id> DetailSection<Id> {
    pub fn new<F>(title: &'static str, lines: F) -> Self
    where
        F: Fn(&Id) -> Result<Vec<String>, String> + Send + Sync + 'static,
    {
        Self {
            title,
            lines: Box::new(lines),
        }
    }

    /// Rows to draw, or the status message to show in their place.
    pub fn lines(&self, id: &Id) -> Result<Vec<String>, String> {
        (self.lines)(id)
    }
}

/// Extra line shown while the filter prompt is open.
pub type FilterNote = Box<dyn Fn() -> Option<String> + Send + Sync>;

const NO_ROW: &str = "Select a row first";

fn value(values: &ToolValues, name: &str) -> String {
    values.get(name).cloned().unwrap_or_default()
}

fn path_prompt() -> TextFields {
    TextFields::new().with_field("path", "File path", "")
}

fn mime_for(extension: &str) -> &'static str {
    match extension {
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Read a local file for upload, rejecting extensions the endpoint will
/// not accept before anything is sent.
pub async fn read_upload(raw: &str, allowed: &[&str]) -> Result<Upload, String> {
    if raw.is_empty() {
        return Err("File path is required".to_string());
    }
    let path = Path::new(raw);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !allowed.contains(&extension.as_str()) {
        return Err(format!("Expected a .{} file", allowed.join(" or .")));
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| format!("Cannot read {}: {}", path.display(), err))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("upload.{extension}"));
    Ok(Upload::new(name, mime_for(&extension), bytes))
}

pub fn import_message(summary: &ImportSummary) -> String {
    let mut message = format!("Imported {} students", summary.created);
    if summary.skipped > 0 {
        message.push_str(&format!(", skipped {}", summary.skipped));
    }
    if let Some(first) = summary.errors.first() {
        message.push_str(&format!(" ({first})"));
    }
    message
}

/// Comma-separated student ids typed into a prompt.
pub fn parse_student_ids(raw: &str) -> Result<Vec<StudentId>, String> {
    let ids: Vec<StudentId> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(StudentId::from)
        .collect();
    if ids.is_empty() {
        return Err("Enter at least one student id".to_string());
    }
    Ok(ids)
}

pub fn parse_schedule(values: &ToolValues) -> Result<ScheduleInput, String> {
    let day: DayOfWeek = value(values, "day").parse().map_err(|err| format!("Day: {err}"))?;
    let start = value(values, "start");
    let end = value(values, "end");
    let parse = |label: &str, raw: &str| {
        NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| format!("{label}: use HH:MM"))
    };
    if parse("Start", &start)? >= parse("End", &end)? {
        return Err("End must be after start".to_string());
    }
    let room = value(values, "room");
    Ok(ScheduleInput {
        day_of_week: day,
        start_time: start,
        end_time: end,
        room: (!room.is_empty()).then_some(room),
    })
}

fn section_lines<T>(state: &QueryState<Vec<T>>, empty: &str, line: impl Fn(&T) -> String) -> Result<Vec<String>, String> {
    match render_decision(state, empty) {
        ListRender::Loading => Err("Loading...".to_string()),
        ListRender::Failed { message, .. } => Err(message),
        ListRender::Empty { message } => Err(message.to_string()),
        ListRender::Items(items) => Ok(items.iter().map(line).collect()),
    }
}

pub fn student_tools(api: &ApiClient, cache: &QueryCache) -> Vec<Tool<StudentId>> {
    let import = Students::import(api, cache);
    let avatar = Students::upload_avatar(api, cache);
    vec![
        Tool::new("Import students from CSV", false, path_prompt, move |_, values| {
            let import = import.clone();
            Box::pin(async move {
                let file = read_upload(&value(&values, "path"), &["csv"]).await?;
                let summary = import.execute(file).await.map_err(|err| err.to_string())?;
                Ok(import_message(&summary))
            })
        }),
        Tool::new("Upload avatar", true, path_prompt, move |target, values| {
            let avatar = avatar.clone();
            Box::pin(async move {
                let id = target.ok_or_else(|| NO_ROW.to_string())?;
                let image = read_upload(&value(&values, "path"), &["png", "jpg", "jpeg"]).await?;
                avatar
                    .execute((id, image))
                    .await
                    .map_err(|err| err.to_string())?;
                Ok("Avatar uploaded".to_string())
            })
        }),
    ]
}

pub fn topic_tools(api: &ApiClient, cache: &QueryCache) -> Vec<Tool<TopicId>> {
    let upload = Topics::upload(api, cache);
    vec![Tool::new("Upload curriculum PDF", false, path_prompt, move |_, values| {
        let upload = upload.clone();
        Box::pin(async move {
            let pdf = read_upload(&value(&values, "path"), &["pdf"]).await?;
            let analysis = upload.execute(pdf).await.map_err(|err| err.to_string())?;
            Ok(format!(
                "Curriculum analysed: {} topics created",
                analysis.topics_created
            ))
        })
    })]
}

pub fn class_tools(api: &ApiClient, cache: &QueryCache) -> Vec<Tool<ClassId>> {
    let assign = Classes::assign_students(api, cache);
    let remove = Classes::remove_student(api, cache);
    let add_slot = ClassSchedules::create(api, cache);
    let drop_slot = ClassSchedules::delete(api, cache);
    vec![
        Tool::new(
            "Assign students",
            true,
            || TextFields::new().with_field("studentIds", "Student ids (comma separated)", ""),
            move |target, values| {
                let assign = assign.clone();
                Box::pin(async move {
                    let id = target.ok_or_else(|| NO_ROW.to_string())?;
                    let students = parse_student_ids(&value(&values, "studentIds"))?;
                    let count = students.len();
                    let class = assign
                        .execute((id, students))
                        .await
                        .map_err(|err| err.to_string())?;
                    Ok(format!("Assigned {count} student(s) to {}", class.name))
                })
            },
        ),
        Tool::new(
            "Remove student",
            true,
            || TextFields::new().with_field("studentId", "Student id", ""),
            move |target, values| {
                let remove = remove.clone();
                Box::pin(async move {
                    let id = target.ok_or_else(|| NO_ROW.to_string())?;
                    let student = value(&values, "studentId");
                    if student.is_empty() {
                        return Err("Student id is required".to_string());
                    }
                    remove
                        .execute((id, StudentId::from(student)))
                        .await
                        .map_err(|err| err.to_string())?;
                    Ok("Student removed from class".to_string())
                })
            },
        ),
        Tool::new(
            "Add lesson to schedule",
            true,
            || {
                TextFields::new()
                    .with_field("day", "Day", "Monday")
                    .with_field("start", "Start (HH:MM)", "")
                    .with_field("end", "End (HH:MM)", "")
                    .with_field("room", "Room", "")
            },
            move |target, values| {
                let add_slot = add_slot.clone();
                Box::pin(async move {
                    let id = target.ok_or_else(|| NO_ROW.to_string())?;
                    let input = parse_schedule(&values)?;
                    let slot = add_slot
                        .execute((id, input))
                        .await
                        .map_err(|err| err.to_string())?;
                    Ok(format!("Scheduled {} {}", slot.day_of_week, slot.start_time))
                })
            },
        ),
        Tool::new(
            "Remove lesson from schedule",
            true,
            || TextFields::new().with_field("scheduleId", "Schedule id", ""),
            move |target, values| {
                let drop_slot = drop_slot.clone();
                Box::pin(async move {
                    let id = target.ok_or_else(|| NO_ROW.to_string())?;
                    let slot = value(&values, "scheduleId");
                    if slot.is_empty() {
                        return Err("Schedule id is required".to_string());
                    }
                    drop_slot
                        .execute((id, ScheduleId::from(slot)))
                        .await
                        .map_err(|err| err.to_string())?;
                    Ok("Lesson removed".to_string())
                })
            },
        ),
    ]
}

pub fn class_schedule_section(api: &ApiClient, cache: &QueryCache) -> DetailSection<ClassId> {
    let api = api.clone();
    let cache = cache.clone();
    DetailSection::new("Schedule", move |id| {
        let state = ClassSchedules::read(&api, &cache, id);
        section_lines(&state, "No lessons scheduled", |slot| {
            let room = slot
                .room
                .as_deref()
                .map(|room| format!(" ({room})"))
                .unwrap_or_default();
            format!(
                "{} {}-{}{} [{}]",
                slot.day_of_week, slot.start_time, slot.end_time, room, slot.id
            )
        })
    })
}

pub fn diagnostic_results_section(api: &ApiClient, cache: &QueryCache) -> DetailSection<DiagnosticTestId> {
    let api = api.clone();
    let cache = cache.clone();
    DetailSection::new("Results", move |id| {
        let state = DiagnosticResults::read(&api, &cache, id);
        section_lines(&state, "No results submitted yet", |result| result.cells().join(" | "))
    })
}

/// Year-group ids next to their names, for typing the `yearGroupId` filter.
pub fn year_group_note(api: &ApiClient, cache: &QueryCache) -> FilterNote {
    let api = api.clone();
    let cache = cache.clone();
    Box::new(move || {
        let state = YearGroups::read(&api, &cache);
        let groups = state.data()?;
        if groups.is_empty() {
            return None;
        }
        let listed: Vec<String> = groups
            .iter()
            .map(|group| format!("{}={}", group.id, group.name))
            .collect();
        Some(format!("Year groups: {}", listed.join(", ")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn values(pairs: &[(&'static str, &str)]) -> ToolValues {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn schedule_prompt_parses_day_and_times() {
        let input = parse_schedule(&values(&[
            ("day", "wed"),
            ("start", "09:00"),
            ("end", "09:50"),
            ("room", ""),
        ]))
        .unwrap();
        assert_eq!(input.day_of_week, DayOfWeek::Wednesday);
        assert_eq!(input.room, None);

        let backwards = parse_schedule(&values(&[("day", "Monday"), ("start", "10:00"), ("end", "09:00")]));
        assert_eq!(backwards, Err("End must be after start".to_string()));
        let bad_time = parse_schedule(&values(&[("day", "Monday"), ("start", "9am"), ("end", "10:00")]));
        assert_eq!(bad_time, Err("Start: use HH:MM".to_string()));
        assert!(parse_schedule(&values(&[("day", "Someday")])).is_err());
    }

    #[test]
    fn student_ids_are_comma_separated() {
        assert_eq!(
            parse_student_ids(" s1, ,s2,").unwrap(),
            vec![StudentId::from("s1"), StudentId::from("s2")]
        );
        assert!(parse_student_ids(" , ").is_err());
    }

    #[test]
    fn import_message_mentions_skips_and_first_error() {
        let summary = ImportSummary {
            created: 3,
            skipped: 1,
            errors: vec!["row 4: missing last name".to_string()],
        };
        assert_eq!(
            import_message(&summary),
            "Imported 3 students, skipped 1 (row 4: missing last name)"
        );
    }

    #[tokio::test]
    async fn uploads_check_extension_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("roster.CSV");
        std::fs::File::create(&csv)
            .unwrap()
            .write_all(b"firstName,lastName\n")
            .unwrap();

        let upload = read_upload(csv.to_str().unwrap(), &["csv"]).await.unwrap();
        assert_eq!(upload.file_name, "roster.CSV");
        assert_eq!(upload.mime, "text/csv");

        let wrong = read_upload(csv.to_str().unwrap(), &["pdf"]).await.unwrap_err();
        assert_eq!(wrong, "Expected a .pdf file");
        let missing = read_upload(dir.path().join("gone.pdf").to_str().unwrap(), &["pdf"]).await;
        assert!(missing.unwrap_err().starts_with("Cannot read"));
        assert_eq!(read_upload("", &["csv"]).await.unwrap_err(), "File path is required");
    }

    #[test]
    fn section_lines_follow_render_decision() {
        let loading: QueryState<Vec<u8>> = QueryState::default();
        assert_eq!(section_lines(&loading, "none", u8::to_string), Err("Loading...".to_string()));
    }
}
