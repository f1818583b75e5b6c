//! Enum types for Scholar entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when parsing an enum value from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for EnumParseError {}

fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Implements `Display` (human label) and `FromStr` (case/separator
/// insensitive) for a fieldless enum.
macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            /// All variants in declaration order.
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = normalize_token(s);
                $(
                    if token == normalize_token($label) $(|| token == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(EnumParseError { kind: $kind, value: s.to_string() })
            }
        }
    };
}

/// Account role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Teacher,
}

labelled_enum!(Role, "role", {
    Admin => "Admin" | "administrator",
    Teacher => "Teacher",
});

/// Shape of an AI-generated classroom activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    #[default]
    Worksheet,
    Quiz,
    Project,
    Discussion,
}

labelled_enum!(ActivityKind, "activity kind", {
    Worksheet => "Worksheet",
    Quiz => "Quiz",
    Project => "Project",
    Discussion => "Discussion",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Foundation,
    #[default]
    Core,
    Extension,
}

labelled_enum!(Difficulty, "difficulty", {
    Foundation => "Foundation" | "easy",
    Core => "Core" | "medium",
    Extension => "Extension" | "hard",
});

/// Review state of a generated activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    #[default]
    Draft,
    Approved,
    Archived,
}

labelled_enum!(ActivityStatus, "activity status", {
    Draft => "Draft" | "pending",
    Approved => "Approved",
    Archived => "Archived",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

labelled_enum!(InterventionStatus, "intervention status", {
    Planned => "Planned",
    Active => "Active" | "inprogress",
    Completed => "Completed" | "complete" | "done",
});

/// Scope of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    #[default]
    Student,
    Class,
    YearGroup,
}

labelled_enum!(ReportKind, "report kind", {
    Student => "Student",
    Class => "Class",
    YearGroup => "Year Group" | "year",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Queued,
    Generating,
    Ready,
    Failed,
}

labelled_enum!(ReportStatus, "report status", {
    Queued => "Queued",
    Generating => "Generating",
    Ready => "Ready" | "complete" | "completed",
    Failed => "Failed",
});

/// Day of the week for timetable slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

labelled_enum!(DayOfWeek, "day of week", {
    Monday => "Monday" | "mon",
    Tuesday => "Tuesday" | "tue",
    Wednesday => "Wednesday" | "wed",
    Thursday => "Thursday" | "thu",
    Friday => "Friday" | "fri",
    Saturday => "Saturday" | "sat",
    Sunday => "Sunday" | "sun",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_and_separator_insensitive() {
        assert_eq!("year_group".parse::<ReportKind>(), Ok(ReportKind::YearGroup));
        assert_eq!("Year Group".parse::<ReportKind>(), Ok(ReportKind::YearGroup));
        assert_eq!("APPROVED".parse::<ActivityStatus>(), Ok(ActivityStatus::Approved));
        assert_eq!("in-progress".parse::<InterventionStatus>(), Ok(InterventionStatus::Active));
        assert_eq!("Wed".parse::<DayOfWeek>(), Ok(DayOfWeek::Wednesday));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "principal".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid role: principal");
    }

    #[test]
    fn wire_format_is_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReportKind::YearGroup).unwrap(),
            "\"YEAR_GROUP\""
        );
        let status: ActivityStatus = serde_json::from_str("\"DRAFT\"").unwrap();
        assert_eq!(status, ActivityStatus::Draft);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in ActivityKind::all() {
            assert_eq!(kind.to_string().parse::<ActivityKind>().as_ref(), Ok(kind));
        }
        for day in DayOfWeek::all() {
            assert_eq!(day.to_string().parse::<DayOfWeek>().as_ref(), Ok(day));
        }
    }
}
