//! Page-level flows: a resource controller, its form modal and the shared
//! cache working against a mock API.

use scholar_client::resources::{StudentDraft, Students};
use scholar_client::{
    ConfirmDialog, ErrorKind, FormModal, ListRender, ModalPhase, QueryCache, QueryKey, QueryState,
    QueryStatus, ResourceController, Resource, render_decision,
};
use scholar_core::{EntityIdType, Student, StudentId};
use std::time::Duration;
use scholar_test_utils::fixtures::{signed_in_client, student, student_in_year};
use scholar_test_utils::mock_api::{base_url, mount_status};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn students_page(server: &MockServer, cache: &QueryCache) -> ResourceController<Students> {
    ResourceController::new(signed_in_client(&base_url(server), "tok-1"), cache.clone())
}

#[tokio::test]
async fn filtered_list_refetches_after_create() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .and(query_param("yearGroupId", "Y7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![student_in_year("stu_1", "Ada", "Lovelace", "Y7")]),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .and(query_param("yearGroupId", "Y7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            student_in_year("stu_1", "Ada", "Lovelace", "Y7"),
            student_in_year("stu_2", "Alan", "Turing", "Y7"),
        ]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/students"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(student_in_year("stu_2", "Alan", "Turing", "Y7")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let mut page = students_page(&server, &cache);
    assert!(page.set_filter("yearGroupId", "Y7"));
    let key = page.query_key();
    assert_eq!(key.to_string(), "students/yearGroupId=Y7");

    let first = page.fetch().await;
    assert_eq!(first.data().map(Vec::len), Some(1));

    let mut modal: FormModal<StudentDraft> = FormModal::new();
    modal.open_create();
    modal.set_field("firstName", "Alan").unwrap();
    modal.set_field("lastName", "Turing").unwrap();
    modal.set_field("yearGroupId", "Y7").unwrap();
    let created = modal.submit(page.create(), page.update()).await.unwrap();
    assert_eq!(created.map(|s| s.id), Some(StudentId::new("stu_2")));
    assert_eq!(modal.phase(), ModalPhase::Closed);

    assert!(cache.is_stale(&key));
    let second = page.fetch().await;
    match render_decision(&second, Students::EMPTY_MESSAGE) {
        ListRender::Items(items) => assert_eq!(items.len(), 2),
        other => panic!("expected items, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_failure_keeps_modal_open_with_server_message() {
    let server = MockServer::start().await;
    mount_status(&server, "POST", "/students", 422, Some("Email already in use")).await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let mut modal: FormModal<StudentDraft> = FormModal::new();
    modal.open_create();
    modal.set_field("firstName", "Ada").unwrap();
    modal.set_field("lastName", "Lovelace").unwrap();
    modal.set_field("email", "ada@school.test").unwrap();

    let created = modal.submit(page.create(), page.update()).await.unwrap();
    assert!(created.is_none());
    assert_eq!(modal.phase(), ModalPhase::Open);
    assert_eq!(modal.error(), Some("Email already in use"));
    assert_eq!(modal.draft().first_name, "Ada");
}

#[tokio::test]
async fn missing_required_field_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/students"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let mut modal: FormModal<StudentDraft> = FormModal::new();
    modal.open_create();
    modal.set_field("lastName", "Lovelace").unwrap();

    assert!(modal.submit(page.create(), page.update()).await.unwrap().is_none());
    assert_eq!(modal.error(), Some("First name is required"));
}

#[tokio::test]
async fn cancelled_delete_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/students/stu_1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let mut confirm = ConfirmDialog::default();
    confirm.request(StudentId::new("stu_1"), "Ada Lovelace");
    assert_eq!(
        confirm.prompt().as_deref(),
        Some("Delete Ada Lovelace? This cannot be undone.")
    );
    confirm.cancel();

    if let Some(id) = confirm.confirm() {
        page.delete().execute(id).await.unwrap();
    }
    assert!(!confirm.is_open());
}

#[tokio::test]
async fn confirmed_delete_invalidates_dependent_views() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/students/stu_1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let classes = QueryKey::new("classes");
    let reports = QueryKey::new("reports");
    cache.fetch(&classes, || async { Ok(vec![1u8]) }).await;
    cache.fetch(&reports, || async { Ok(vec![1u8]) }).await;

    let page = students_page(&server, &cache);
    let mut confirm = ConfirmDialog::default();
    confirm.request(StudentId::new("stu_1"), "Ada Lovelace");
    let id = confirm.confirm().unwrap();
    page.delete().execute(id).await.unwrap();

    assert!(cache.is_stale(&classes));
    assert!(!cache.is_stale(&reports));
}

#[tokio::test]
async fn delete_with_acknowledgement_body_still_invalidates() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/students/stu_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "Student deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![student("stu_1", "Ada", "Lovelace")]))
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let key = page.query_key();
    page.fetch().await;
    assert!(!cache.is_stale(&key));

    let deleted = page.delete().execute(StudentId::new("stu_1")).await;
    assert!(deleted.is_ok());
    assert!(cache.is_stale(&key));
}

#[tokio::test]
async fn late_result_for_previous_filter_never_lands_on_the_new_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .and(query_param("yearGroupId", "Y7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![student_in_year("stu_1", "Ada", "Lovelace", "Y7")])
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .and(query_param("yearGroupId", "Y8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![student_in_year("stu_2", "Alan", "Turing", "Y8")]),
        )
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let mut page = students_page(&server, &cache);
    page.set_filter("yearGroupId", "Y7");
    let year7 = page.query_key();
    assert!(page.read().is_loading());

    page.set_filter("yearGroupId", "Y8");
    let year8 = page.query_key();
    let current = page.fetch().await;
    assert_eq!(current.data().unwrap()[0].id, StudentId::new("stu_2"));

    let late: QueryState<Vec<Student>> = cache.settled(&year7).await;
    assert_eq!(late.data().unwrap()[0].id, StudentId::new("stu_1"));

    assert_eq!(page.query_key(), year8);
    let after = page.read();
    assert_eq!(after.status, QueryStatus::Success);
    assert_eq!(after.data().map(Vec::len), Some(1));
    assert_eq!(after.data().unwrap()[0].id, StudentId::new("stu_2"));
}

#[tokio::test]
async fn expired_token_sends_the_user_back_to_login() {
    let server = MockServer::start().await;
    mount_status(&server, "GET", "/students", 401, None).await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let mut session = page.api().session().subscribe();

    let state = page.fetch().await;
    assert_eq!(state.error.as_ref().map(|e| e.kind), Some(ErrorKind::Unauthorized));
    match render_decision(&state, Students::EMPTY_MESSAGE) {
        ListRender::Failed { retryable, .. } => assert!(!retryable),
        other => panic!("expected failure, got {other:?}"),
    }

    session.changed().await.unwrap();
    assert!(session.borrow().is_none());
}

#[tokio::test]
async fn empty_success_renders_empty_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let state = page.fetch().await;
    assert!(state.is_empty_success());
    assert_eq!(
        render_decision(&state, Students::EMPTY_MESSAGE),
        ListRender::Empty {
            message: Students::EMPTY_MESSAGE
        }
    );
}

#[tokio::test]
async fn edit_modal_prefills_from_entity_and_puts_update() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/students/stu_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(student("stu_1", "Ada", "King")))
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let page = students_page(&server, &cache);
    let ada = student("stu_1", "Ada", "Lovelace");
    let mut modal: FormModal<StudentDraft> = FormModal::new();
    modal.open_edit(Students::id(&ada), &ada);
    assert_eq!(modal.draft().last_name, "Lovelace");

    modal.set_field("lastName", "King").unwrap();
    let updated = modal.submit(page.create(), page.update()).await.unwrap().unwrap();
    assert_eq!(updated.last_name, "King");
}
