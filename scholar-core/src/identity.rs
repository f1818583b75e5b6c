//! Identity types for Scholar entities

use chrono::{DateTime, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Common behaviour shared by every strongly-typed identifier.
pub trait EntityIdType:
    Clone + Eq + Ord + std::hash::Hash + std::fmt::Display + Send + Sync + 'static
{
    /// Entity name used in diagnostics ("student", "class", ...).
    const ENTITY_NAME: &'static str;

    /// Wrap a raw server identifier.
    fn new(raw: impl Into<String>) -> Self;

    /// Borrow the raw identifier.
    fn as_str(&self) -> &str;
}

/// Declares a transparent string identifier newtype.
///
/// The backend issues opaque string ids; wrapping them keeps a `ClassId`
/// from being passed where a `StudentId` is expected.
macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl EntityIdType for $name {
            const ENTITY_NAME: &'static str = $entity;

            fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a student record.
    StudentId,
    "student"
);
define_entity_id!(
    /// Identifier of a teaching class.
    ClassId,
    "class"
);
define_entity_id!(
    /// Identifier of a staff member with a teacher profile.
    TeacherId,
    "teacher"
);
define_entity_id!(
    /// Identifier of a year group (e.g. `Y7`).
    YearGroupId,
    "year group"
);
define_entity_id!(TopicId, "topic");
define_entity_id!(ActivityId, "activity");
define_entity_id!(AssignmentId, "assignment");
define_entity_id!(DiagnosticTestId, "diagnostic test");
define_entity_id!(InterventionId, "intervention");
define_entity_id!(NoteId, "note");
define_entity_id!(ReportId, "report");
define_entity_id!(ScheduleId, "schedule");
define_entity_id!(
    /// Identifier of an authenticated user account.
    UserId,
    "user"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = StudentId::new("stu_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"stu_42\"");
        let back: StudentId = serde_json::from_str("\"stu_42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(YearGroupId::from("Y7").to_string(), "Y7");
        assert_eq!(ClassId::ENTITY_NAME, "class");
    }
}
