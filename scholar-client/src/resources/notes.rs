use super::{ApiResult, Column, FilterField, ListRow, Resource};
use crate::api_client::ApiClient;
use crate::display::format_date;
use crate::filter::FilterSet;
use crate::form::{Draft, FormError, FormField};
use futures_util::future::BoxFuture;
use scholar_core::{Note, NoteFilter, NoteId, NoteInput, StudentId};

/// Longest preview shown in the notes table.
const PREVIEW_CHARS: usize = 60;

pub struct Notes;

impl Resource for Notes {
    const NAME: &'static str = "notes";
    const LABEL: &'static str = "note";
    const TITLE: &'static str = "Notes";
    const EMPTY_MESSAGE: &'static str = "No notes recorded";

    type Id = NoteId;
    type Item = Note;
    type Draft = NoteDraft;

    fn id(item: &Note) -> NoteId {
        item.id.clone()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[FilterField::new("studentId", "Student")];
        FILTERS
    }

    fn list(api: ApiClient, filters: FilterSet) -> BoxFuture<'static, ApiResult<Vec<Note>>> {
        Box::pin(async move {
            let filter = NoteFilter {
                student_id: filters.value("studentId"),
            };
            api.list_notes(&filter).await
        })
    }

    fn create(api: ApiClient, input: NoteInput) -> BoxFuture<'static, ApiResult<Note>> {
        Box::pin(async move { api.create_note(&input).await })
    }

    fn update(api: ApiClient, id: NoteId, input: NoteInput) -> BoxFuture<'static, ApiResult<Note>> {
        Box::pin(async move { api.update_note(&id, &input).await })
    }

    fn delete(api: ApiClient, id: NoteId) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async move { api.delete_note(&id).await })
    }
}

fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

impl ListRow for Note {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("Student", 18),
            Column::new("Note", 52),
            Column::new("Author", 15),
            Column::new("Date", 15),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            preview(&self.content),
            self.author_name.clone().unwrap_or_default(),
            format_date(self.created_at),
        ]
    }

    fn title(&self) -> String {
        format!("note \"{}\"", preview(&self.content))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub student_id: String,
    pub content: String,
}

impl Draft for NoteDraft {
    type Entity = Note;
    type Id = NoteId;
    type Input = NoteInput;

    fn from_entity(note: &Note) -> Self {
        Self {
            student_id: note.student_id.to_string(),
            content: note.content.clone(),
        }
    }

    fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("studentId", "Student", self.student_id.clone()),
            FormField::required("content", "Note", self.content.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "studentId" => self.student_id = value.to_string(),
            "content" => self.content = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_input(&self) -> Result<NoteInput, FormError> {
        Ok(NoteInput {
            student_id: StudentId::from(self.student_id.trim()),
            content: self.content.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_first_line() {
        assert_eq!(preview("short\nsecond line"), "short");
        let long = "x".repeat(80);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS);
        assert!(cut.ends_with("..."));
    }
}
