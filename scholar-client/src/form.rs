//! Create/edit modals, multi-select sets and delete confirmation.
//!
//! A modal moves `Closed -> Open -> Submitting -> Closed` on success, or
//! back to `Open` with an inline error on failure. Cancelling discards the
//! draft. Submissions carry the modal's epoch so a result arriving after
//! the user closed or reopened the modal is ignored.

use crate::mutation::Mutation;
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{label} is required")]
    Required { label: &'static str },
    #[error("Invalid {label}: {reason}")]
    Invalid { label: &'static str, reason: String },
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("The form is not open")]
    NotOpen,
    #[error("Already submitting")]
    Busy,
}

/// One editable field as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl FormField {
    pub fn required(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            value: value.into(),
            required: true,
        }
    }

    pub fn optional(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            value: value.into(),
            required: false,
        }
    }
}

/// Controlled form state for one resource.
pub trait Draft: Clone + Default + Send + 'static {
    type Entity;
    type Id: Clone + std::fmt::Debug + Send + 'static;
    type Input: Send + 'static;

    fn from_entity(entity: &Self::Entity) -> Self;

    fn fields(&self) -> Vec<FormField>;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError>;

    /// Convert to the wire input. Called only after required fields pass.
    fn to_input(&self) -> Result<Self::Input, FormError>;

    /// Non-empty check on every required field.
    fn validate(&self) -> Result<(), FormError> {
        match self
            .fields()
            .into_iter()
            .find(|field| field.required && field.value.trim().is_empty())
        {
            Some(field) => Err(FormError::Required { label: field.label }),
            None => Ok(()),
        }
    }
}

/// Multi-select set of ids, submitted as an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<Id: Ord>(BTreeSet<Id>);

impl<Id: Ord> Default for Selection<Id> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<Id: Ord + Clone> Selection<Id> {
    /// Flip membership. Returns whether `id` is now selected.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.0.contains(id)
    }

    pub fn to_vec(&self) -> Vec<Id> {
        self.0.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<Id: Ord + std::fmt::Display> Selection<Id> {
    /// Comma-separated rendering for text inputs.
    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<Id: Ord + From<String>> Selection<Id> {
    pub fn from_csv(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Id::from(s.to_string()))
            .collect()
    }
}

impl<Id: Ord> FromIterator<Id> for Selection<Id> {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode<Id> {
    Create,
    Edit(Id),
}

/// What to send once validation passes.
#[derive(Debug, Clone)]
pub struct Submission<Id, Input> {
    pub epoch: u64,
    pub mode: ModalMode<Id>,
    pub input: Input,
}

#[derive(Debug, Clone)]
pub struct FormModal<D: Draft> {
    phase: ModalPhase,
    mode: ModalMode<D::Id>,
    draft: D,
    error: Option<String>,
    epoch: u64,
}

impl<D: Draft> Default for FormModal<D> {
    fn default() -> Self {
        Self {
            phase: ModalPhase::Closed,
            mode: ModalMode::Create,
            draft: D::default(),
            error: None,
            epoch: 0,
        }
    }
}

impl<D: Draft> FormModal<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create(&mut self) {
        self.open(ModalMode::Create, D::default());
    }

    pub fn open_edit(&mut self, id: D::Id, entity: &D::Entity) {
        self.open(ModalMode::Edit(id), D::from_entity(entity));
    }

    fn open(&mut self, mode: ModalMode<D::Id>, draft: D) {
        self.epoch += 1;
        self.phase = ModalPhase::Open;
        self.mode = mode;
        self.draft = draft;
        self.error = None;
    }

    /// Close and discard the draft. A pending submission is detached.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        self.phase = ModalPhase::Closed;
        self.draft = D::default();
        self.error = None;
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    /// Submit is disabled while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.phase == ModalPhase::Open
    }

    pub fn mode(&self) -> &ModalMode<D::Id> {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        if self.phase != ModalPhase::Open {
            return Err(FormError::NotOpen);
        }
        self.draft.set_field(name, value)
    }

    /// Validate and move to `Submitting`. Validation failures keep the
    /// modal open with the message shown inline.
    pub fn begin_submit(&mut self) -> Result<Submission<D::Id, D::Input>, FormError> {
        match self.phase {
            ModalPhase::Closed => return Err(FormError::NotOpen),
            ModalPhase::Submitting => return Err(FormError::Busy),
            ModalPhase::Open => {}
        }
        let input = self
            .draft
            .validate()
            .and_then(|()| self.draft.to_input())
            .inspect_err(|err| self.error = Some(err.to_string()))?;
        self.phase = ModalPhase::Submitting;
        self.error = None;
        Ok(Submission {
            epoch: self.epoch,
            mode: self.mode.clone(),
            input,
        })
    }

    /// Apply a submission result. Returns `false` when the submission was
    /// detached by a cancel or reopen.
    pub fn finish_submit(&mut self, epoch: u64, result: Result<(), String>) -> bool {
        if epoch != self.epoch || self.phase != ModalPhase::Submitting {
            return false;
        }
        match result {
            Ok(()) => {
                self.phase = ModalPhase::Closed;
                self.draft = D::default();
                self.error = None;
            }
            Err(message) => {
                self.phase = ModalPhase::Open;
                self.error = Some(message);
            }
        }
        true
    }

    /// Run the whole submit cycle against the create or update mutation.
    /// `Ok(None)` means validation or the server rejected the draft and the
    /// modal stayed open.
    pub async fn submit<T>(
        &mut self,
        create: &Mutation<D::Input, T>,
        update: &Mutation<(D::Id, D::Input), T>,
    ) -> Result<Option<T>, FormError>
    where
        T: Send + 'static,
    {
        let submission = match self.begin_submit() {
            Ok(submission) => submission,
            Err(FormError::Required { .. } | FormError::Invalid { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        let result = match submission.mode {
            ModalMode::Create => create.execute(submission.input).await,
            ModalMode::Edit(id) => update.execute((id, submission.input)).await,
        };
        match result {
            Ok(value) => {
                self.finish_submit(submission.epoch, Ok(()));
                Ok(Some(value))
            }
            Err(err) => {
                self.finish_submit(submission.epoch, Err(err.to_string()));
                Ok(None)
            }
        }
    }
}

/// Confirmation step in front of every destructive action.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<Id> {
    pending: Option<(Id, String)>,
}

impl<Id> Default for ConfirmDialog<Id> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<Id: Clone> ConfirmDialog<Id> {
    pub fn request(&mut self, id: Id, label: impl Into<String>) {
        self.pending = Some((id, label.into()));
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn prompt(&self) -> Option<String> {
        self.pending
            .as_ref()
            .map(|(_, label)| format!("Delete {label}? This cannot be undone."))
    }

    /// The id to act on. Closes the dialog.
    pub fn confirm(&mut self) -> Option<Id> {
        self.pending.take().map(|(id, _)| id)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiClientError;
    use crate::query::QueryCache;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct NameDraft {
        name: String,
        tags: Selection<String>,
    }

    impl Draft for NameDraft {
        type Entity = String;
        type Id = u32;
        type Input = (String, Vec<String>);

        fn from_entity(entity: &String) -> Self {
            Self {
                name: entity.clone(),
                tags: Selection::default(),
            }
        }

        fn fields(&self) -> Vec<FormField> {
            vec![
                FormField::required("name", "Name", self.name.clone()),
                FormField::optional("tags", "Tags", self.tags.to_csv()),
            ]
        }

        fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
            match name {
                "name" => self.name = value.to_string(),
                "tags" => self.tags = Selection::from_csv(value),
                other => return Err(FormError::UnknownField(other.to_string())),
            }
            Ok(())
        }

        fn to_input(&self) -> Result<Self::Input, FormError> {
            Ok((self.name.trim().to_string(), self.tags.to_vec()))
        }
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::default();
        assert!(selection.toggle("s1".to_string()));
        assert!(selection.toggle("s2".to_string()));
        assert!(!selection.toggle("s1".to_string()));
        assert_eq!(selection.to_vec(), vec!["s2".to_string()]);
    }

    #[test]
    fn required_fields_block_submission() {
        let mut modal = FormModal::<NameDraft>::new();
        modal.open_create();
        let err = modal.begin_submit().unwrap_err();
        assert_eq!(err, FormError::Required { label: "Name" });
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.error(), Some("Name is required"));
    }

    #[test]
    fn cancel_discards_draft_and_detaches_submission() {
        let mut modal = FormModal::<NameDraft>::new();
        modal.open_edit(7, &"Ada".to_string());
        modal.set_field("tags", "b, a").unwrap();
        let submission = modal.begin_submit().unwrap();
        assert_eq!(submission.input, ("Ada".to_string(), vec!["a".into(), "b".into()]));
        assert!(!modal.can_submit());

        modal.cancel();
        assert_eq!(modal.draft(), &NameDraft::default());
        assert!(!modal.finish_submit(submission.epoch, Ok(())));
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[tokio::test]
    async fn failed_submit_keeps_modal_open_with_error() {
        let cache = QueryCache::new();
        let create = Mutation::new(cache.clone(), "create", "tag", |_: (String, Vec<String>)| async {
            Err::<(), _>(ApiClientError::Validation {
                status: 409,
                message: "Name taken".into(),
            })
        });
        let update = Mutation::new(cache, "update", "tag", |_: (u32, (String, Vec<String>))| async {
            Ok(())
        });

        let mut modal = FormModal::<NameDraft>::new();
        modal.open_create();
        modal.set_field("name", "Dup").unwrap();
        assert_eq!(modal.submit(&create, &update).await, Ok(None));
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.error(), Some("Name taken"));

        modal.cancel();
        modal.open_edit(1, &"Kept".to_string());
        assert_eq!(modal.submit(&create, &update).await, Ok(Some(())));
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[test]
    fn confirm_dialog_yields_id_once() {
        let mut dialog = ConfirmDialog::default();
        dialog.request(3u32, "Ada Lovelace");
        assert_eq!(
            dialog.prompt().as_deref(),
            Some("Delete Ada Lovelace? This cannot be undone.")
        );
        assert_eq!(dialog.confirm(), Some(3));
        assert_eq!(dialog.confirm(), None);

        dialog.request(4, "Y7 Maths");
        dialog.cancel();
        assert!(!dialog.is_open());
    }
}
