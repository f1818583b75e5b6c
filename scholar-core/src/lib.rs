//! Scholar Core - Wire Types
//!
//! Data structures shared by the API client and the dashboard front-end.
//! This crate contains only types and formatting helpers - no I/O.

mod enums;
mod identity;
pub mod types;

pub use enums::*;
pub use identity::*;
pub use types::*;

/// Join a first and last name, tolerating either part being blank.
pub fn full_name(first: &str, last: &str) -> String {
    match (first.trim(), last.trim()) {
        ("", "") => String::new(),
        (first, "") => first.to_string(),
        ("", last) => last.to_string(),
        (first, last) => format!("{first} {last}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn full_name_joins_with_single_space() {
        assert_eq!(full_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(full_name(" Ada ", ""), "Ada");
        assert_eq!(full_name("", "Lovelace"), "Lovelace");
        assert_eq!(full_name("", " "), "");
    }

    #[test]
    fn student_decodes_with_null_collections() {
        let json = r#"{
            "id": "stu_1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "yearGroupId": "Y7",
            "classIds": null,
            "averageScore": 83.5
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.full_name(), "Ada Lovelace");
        assert!(student.class_ids.is_empty());
        assert_eq!(student.year_group_id, Some(YearGroupId::from("Y7")));
    }

    #[test]
    fn empty_filter_serializes_to_empty_object() {
        let filter = StudentFilter::default();
        assert_eq!(serde_json::to_string(&filter).unwrap(), "{}");
        let filter = StudentFilter {
            year_group_id: Some("Y7".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&filter).unwrap(),
            r#"{"yearGroupId":"Y7"}"#
        );
    }

    #[test]
    fn generate_report_request_uses_camel_case() {
        let req = GenerateReportRequest {
            title: "Autumn".into(),
            kind: ReportKind::YearGroup,
            subject_id: "Y7".into(),
            period: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["kind"], "YEAR_GROUP");
        assert_eq!(value["subjectId"], "Y7");
        assert!(value.get("period").is_none());
    }

    proptest! {
        #[test]
        fn full_name_never_has_outer_whitespace(first in "[ a-zA-Z]{0,12}", last in "[ a-zA-Z]{0,12}") {
            let name = full_name(&first, &last);
            prop_assert_eq!(name.trim(), name.as_str());
        }
    }
}
