//! Line-edit buffers for forms, filter prompts and the login screen.
//!
//! Buffers hold raw text. Typed values are parsed only when the form is
//! submitted, so a half-typed status or number never blocks editing.

use crate::keys::TextKey;
use crate::widgets::FieldLine;
use scholar_client::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Editing,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
struct Slot {
    name: &'static str,
    label: &'static str,
    value: String,
    required: bool,
    secret: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TextFields {
    slots: Vec<Slot>,
    focus: usize,
}

impl TextFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_form(fields: Vec<FormField>) -> Self {
        let mut inputs = Self::new();
        for field in fields {
            inputs.slots.push(Slot {
                name: field.name,
                label: field.label,
                value: field.value,
                required: field.required,
                secret: false,
            });
        }
        inputs
    }

    pub fn with_field(mut self, name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        self.slots.push(Slot {
            name,
            label,
            value: value.into(),
            required: false,
            secret: false,
        });
        self
    }

    /// Adds a required field whose value is masked on screen.
    pub fn with_secret(mut self, name: &'static str, label: &'static str) -> Self {
        self.slots.push(Slot {
            name,
            label,
            value: String::new(),
            required: true,
            secret: true,
        });
        self
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.slots.iter().map(|slot| (slot.name, slot.value.as_str()))
    }

    pub fn apply(&mut self, key: TextKey) -> InputOutcome {
        let len = self.slots.len();
        match key {
            TextKey::Submit => return InputOutcome::Submit,
            TextKey::Cancel => return InputOutcome::Cancel,
            TextKey::NextField if len > 0 => self.focus = (self.focus + 1) % len,
            TextKey::PrevField if len > 0 => self.focus = (self.focus + len - 1) % len,
            TextKey::Char(c) => {
                if let Some(slot) = self.slots.get_mut(self.focus) {
                    slot.value.push(c);
                }
            }
            TextKey::Backspace => {
                if let Some(slot) = self.slots.get_mut(self.focus) {
                    slot.value.pop();
                }
            }
            TextKey::NextField | TextKey::PrevField => {}
        }
        InputOutcome::Editing
    }

    pub fn lines(&self) -> Vec<FieldLine> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| FieldLine {
                label: slot.label.to_string(),
                value: slot.value.clone(),
                required: slot.required,
                focused: idx == self.focus,
                secret: slot.secret,
            })
            .collect()
    }
}
