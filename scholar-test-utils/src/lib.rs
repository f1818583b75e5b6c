//! Scholar Test Utilities
//!
//! Shared test infrastructure for the Scholar workspace:
//! - Proptest generators for wire types and cache keys
//! - Fixtures for common entities and client setups
//! - Mock API helpers on top of `wiremock`

pub use scholar_client::{ApiClient, ClientConfig, QueryCache, QueryKey, Session, SessionService};
pub use scholar_core::{
    ClassId, EntityIdType, LoginResponse, Role, SchoolClass, SessionUser, Student, StudentId,
    Teacher, TeacherId, UserId, YearGroupId,
};

use chrono::Utc;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Scholar types.

    use super::*;
    use proptest::prelude::*;
    use scholar_core::Timestamp;

    /// Short server-style identifier, e.g. `stu_k3x9`.
    pub fn arb_raw_id(prefix: &'static str) -> impl Strategy<Value = String> {
        "[a-z0-9]{4,10}".prop_map(move |s| format!("{prefix}_{s}"))
    }

    pub fn arb_student_id() -> impl Strategy<Value = StudentId> {
        arb_raw_id("stu").prop_map(StudentId::new)
    }

    pub fn arb_class_id() -> impl Strategy<Value = ClassId> {
        arb_raw_id("cls").prop_map(ClassId::new)
    }

    pub fn arb_year_group_id() -> impl Strategy<Value = YearGroupId> {
        (7u8..=13).prop_map(|year| YearGroupId::new(format!("Y{year}")))
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Percentage as the API reports it, including out-of-range noise.
    pub fn arb_score() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => 0.0f64..=100.0,
            1 => -10.0f64..0.0,
            1 => 100.0f64..150.0,
        ]
    }

    pub fn arb_student() -> impl Strategy<Value = Student> {
        (
            arb_student_id(),
            "[A-Z][a-z]{1,10}",
            "[A-Z][a-z]{1,12}",
            prop::option::of(arb_year_group_id()),
            prop::collection::vec(arb_class_id(), 0..4),
            prop::option::of(0.0f64..=100.0),
        )
            .prop_map(|(id, first_name, last_name, year_group_id, class_ids, average_score)| Student {
                id,
                first_name,
                last_name,
                email: None,
                year_group_id,
                year_group_name: None,
                class_ids,
                avatar_url: None,
                average_score,
                created_at: None,
            })
    }

    /// Filter name/value pairs as a page would set them. Values may be blank.
    pub fn arb_filters() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(
            (
                prop_oneof![
                    Just("search".to_string()),
                    Just("yearGroupId".to_string()),
                    Just("classId".to_string()),
                    Just("status".to_string()),
                ],
                "[ a-zA-Z0-9]{0,8}",
            ),
            0..6,
        )
    }

    /// Cache keys made from a few roots so prefixes actually overlap.
    pub fn arb_query_key() -> impl Strategy<Value = QueryKey> {
        (
            prop_oneof![
                Just("students"),
                Just("classes"),
                Just("dashboard"),
                Just("reports"),
            ],
            prop::collection::vec("[a-z0-9]{1,6}", 0..3),
            arb_filters(),
        )
            .prop_map(|(root, path, filters)| {
                let key = path
                    .into_iter()
                    .fold(QueryKey::new(root), |key, segment| key.path(segment));
                key.with_filters(filters.iter().map(|(n, v)| (n.as_str(), v.as_str())))
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made entities and client setups.

    use super::*;
    use std::path::Path;

    pub fn student(id: &str, first: &str, last: &str) -> Student {
        Student {
            id: StudentId::new(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            year_group_id: None,
            year_group_name: None,
            class_ids: Vec::new(),
            avatar_url: None,
            average_score: None,
            created_at: None,
        }
    }

    pub fn student_in_year(id: &str, first: &str, last: &str, year: &str) -> Student {
        Student {
            year_group_id: Some(YearGroupId::new(year)),
            year_group_name: Some(year.to_string()),
            ..student(id, first, last)
        }
    }

    pub fn class(id: &str, name: &str) -> SchoolClass {
        SchoolClass {
            id: ClassId::new(id),
            name: name.to_string(),
            subject: None,
            year_group_id: None,
            teacher_ids: Vec::new(),
            student_ids: Vec::new(),
            student_count: 0,
            average_score: None,
        }
    }

    pub fn teacher(id: &str, first: &str, last: &str) -> Teacher {
        Teacher {
            id: TeacherId::new(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@school.test", first.to_lowercase()),
            subjects: Vec::new(),
            class_ids: Vec::new(),
        }
    }

    pub fn session_user(role: Role) -> SessionUser {
        SessionUser {
            id: UserId::new("usr_1"),
            role,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: Some("grace@school.test".to_string()),
        }
    }

    pub fn login_response(token: &str) -> LoginResponse {
        LoginResponse {
            token: token.to_string(),
            user: session_user(Role::Teacher),
        }
    }

    pub fn session(token: &str) -> Session {
        Session::from(login_response(token))
    }

    /// Config pointing at `base_url` with the session file under `dir`.
    pub fn client_config(base_url: &str, dir: &Path) -> ClientConfig {
        ClientConfig {
            api_base_url: base_url.to_string(),
            request_timeout_ms: 2_000,
            upload_timeout_ms: 10_000,
            session_path: dir.join("session.json"),
        }
    }

    /// Facade over an in-memory session, already signed in with `token`.
    pub fn signed_in_client(base_url: &str, token: &str) -> ApiClient {
        let service = SessionService::in_memory();
        service
            .set(session(token))
            .unwrap_or_else(|err| panic!("in-memory session rejected: {err}"));
        anonymous_client_with(base_url, service)
    }

    pub fn anonymous_client(base_url: &str) -> ApiClient {
        anonymous_client_with(base_url, SessionService::in_memory())
    }

    fn anonymous_client_with(base_url: &str, session: SessionService) -> ApiClient {
        let dir = std::env::temp_dir();
        ApiClient::new(&client_config(base_url, &dir), session)
            .unwrap_or_else(|err| panic!("test client config rejected: {err}"))
    }
}

// ============================================================================
// MOCK API
// ============================================================================

pub mod mock_api {
    //! Helpers for mounting Scholar endpoints on a `wiremock` server.

    use serde::Serialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Base URL the client should use for `server`.
    pub fn base_url(server: &MockServer) -> String {
        format!("{}/api", server.uri())
    }

    pub fn api_path(endpoint: &str) -> String {
        format!("/api{endpoint}")
    }

    pub async fn mount_json<T: Serialize>(server: &MockServer, verb: &str, endpoint: &str, body: &T) {
        Mock::given(method(verb))
            .and(path(api_path(endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    pub async fn mount_status(server: &MockServer, verb: &str, endpoint: &str, status: u16, message: Option<&str>) {
        let template = match message {
            Some(message) => ResponseTemplate::new(status)
                .set_body_json(serde_json::json!({ "message": message, "status": status })),
            None => ResponseTemplate::new(status),
        };
        Mock::given(method(verb))
            .and(path(api_path(endpoint)))
            .respond_with(template)
            .mount(server)
            .await;
    }
}
