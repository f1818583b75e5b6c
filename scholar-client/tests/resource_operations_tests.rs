//! Resource operations outside the list/create/update/delete cycle:
//! uploads, class rosters and timetables, diagnostic results and the
//! year-group lookup. Each write is checked for the prefixes it marks
//! stale.

use scholar_client::resources::{ClassSchedules, Classes, DiagnosticResults, Students, Topics, YearGroups};
use scholar_client::{QueryCache, QueryKey, QueryState, Upload};
use scholar_core::{
    ClassId, ClassSchedule, DayOfWeek, DiagnosticResult, DiagnosticTestId, EntityIdType,
    ScheduleId, ScheduleInput, StudentId, YearGroup,
};
use scholar_test_utils::fixtures::{class, signed_in_client};
use scholar_test_utils::mock_api::{base_url, mount_json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn seed(cache: &QueryCache, roots: &[&str]) -> Vec<QueryKey> {
    let mut keys = Vec::new();
    for root in roots {
        let key = QueryKey::new(*root).with_filters([("search", "a")]);
        let _: QueryState<Vec<u8>> = cache.fetch(&key, || async { Ok(vec![1u8]) }).await;
        keys.push(key);
    }
    keys
}

fn csv() -> Upload {
    Upload::new("students.csv", "text/csv", b"firstName,lastName\nAda,Lovelace\n".to_vec())
}

#[tokio::test]
async fn student_import_refreshes_students_classes_and_dashboard() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/students/import",
        &serde_json::json!({ "created": 2, "skipped": 0, "errors": [] }),
    )
    .await;

    let cache = QueryCache::new();
    let keys = seed(&cache, &["students", "classes", "dashboard", "reports"]).await;
    let api = signed_in_client(&base_url(&server), "tok-1");

    let summary = Students::import(&api, &cache).execute(csv()).await.unwrap();
    assert_eq!(summary.created, 2);
    assert!(cache.is_stale(&keys[0]));
    assert!(cache.is_stale(&keys[1]));
    assert!(cache.is_stale(&keys[2]));
    assert!(!cache.is_stale(&keys[3]));
}

#[tokio::test]
async fn avatar_upload_only_touches_students() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/students/stu_1/avatar",
        &serde_json::json!({ "url": "https://cdn.school.test/a/stu_1.png" }),
    )
    .await;

    let cache = QueryCache::new();
    let keys = seed(&cache, &["students", "classes"]).await;
    let api = signed_in_client(&base_url(&server), "tok-1");

    let image = Upload::new("ada.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    let asset = Students::upload_avatar(&api, &cache)
        .execute((StudentId::new("stu_1"), image))
        .await
        .unwrap();
    assert!(asset.url.ends_with("stu_1.png"));
    assert!(cache.is_stale(&keys[0]));
    assert!(!cache.is_stale(&keys[1]));
}

#[tokio::test]
async fn curriculum_upload_refreshes_topics_and_activities() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/curriculum/upload",
        &serde_json::json!({
            "topicsCreated": 1,
            "topics": [{ "id": "top_1", "title": "Fractions", "subject": "Maths", "position": 1 }]
        }),
    )
    .await;

    let cache = QueryCache::new();
    let keys = seed(&cache, &["topics", "activities", "students"]).await;
    let api = signed_in_client(&base_url(&server), "tok-1");

    let pdf = Upload::new("scheme.pdf", "application/pdf", b"%PDF-1.7".to_vec());
    let analysis = Topics::upload(&api, &cache).execute(pdf).await.unwrap();
    assert_eq!(analysis.topics_created, 1);
    assert_eq!(analysis.topics[0].title, "Fractions");
    assert!(cache.is_stale(&keys[0]));
    assert!(cache.is_stale(&keys[1]));
    assert!(!cache.is_stale(&keys[2]));
}

#[tokio::test]
async fn roster_changes_refresh_classes_and_students() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/classes/cls_1/students"))
        .and(body_json(serde_json::json!({ "studentIds": ["stu_1", "stu_2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(class("cls_1", "7B Maths")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/classes/cls_1/students/stu_2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let api = signed_in_client(&base_url(&server), "tok-1");

    let keys = seed(&cache, &["classes", "students", "dashboard"]).await;
    let updated = Classes::assign_students(&api, &cache)
        .execute((
            ClassId::new("cls_1"),
            vec![StudentId::new("stu_1"), StudentId::new("stu_2")],
        ))
        .await
        .unwrap();
    assert_eq!(updated.name, "7B Maths");
    assert!(cache.is_stale(&keys[0]));
    assert!(cache.is_stale(&keys[1]));
    assert!(!cache.is_stale(&keys[2]));

    let keys = seed(&cache, &["classes", "students"]).await;
    Classes::remove_student(&api, &cache)
        .execute((ClassId::new("cls_1"), StudentId::new("stu_2")))
        .await
        .unwrap();
    assert!(cache.is_stale(&keys[0]));
    assert!(cache.is_stale(&keys[1]));
}

#[tokio::test]
async fn class_schedule_reads_sorted_and_writes_refresh_it() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/classes/cls_1/schedules",
        &serde_json::json!([
            { "id": "sch_2", "classId": "cls_1", "dayOfWeek": "WEDNESDAY", "startTime": "09:00", "endTime": "09:50" },
            { "id": "sch_1", "classId": "cls_1", "dayOfWeek": "MONDAY", "startTime": "13:00", "endTime": "13:50", "room": "B12" },
            { "id": "sch_3", "classId": "cls_1", "dayOfWeek": "MONDAY", "startTime": "08:40", "endTime": "09:30" }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/classes/cls_1/schedules"))
        .and(body_json(serde_json::json!({
            "dayOfWeek": "FRIDAY",
            "startTime": "10:00",
            "endTime": "10:50",
            "room": "Lab 2"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "sch_4", "classId": "cls_1", "dayOfWeek": "FRIDAY",
            "startTime": "10:00", "endTime": "10:50", "room": "Lab 2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/classes/cls_1/schedules/sch_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "Deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let api = signed_in_client(&base_url(&server), "tok-1");
    let class_id = ClassId::new("cls_1");
    let key = ClassSchedules::key(&class_id);

    assert!(ClassSchedules::read(&api, &cache, &class_id).is_loading());
    let slots: QueryState<Vec<ClassSchedule>> = cache.settled(&key).await;
    let order: Vec<&str> = slots
        .data()
        .unwrap()
        .iter()
        .map(|slot| slot.id.as_str())
        .collect();
    assert_eq!(order, vec!["sch_3", "sch_1", "sch_2"]);

    let created = ClassSchedules::create(&api, &cache)
        .execute((
            class_id.clone(),
            ScheduleInput {
                day_of_week: DayOfWeek::Friday,
                start_time: "10:00".into(),
                end_time: "10:50".into(),
                room: Some("Lab 2".into()),
            },
        ))
        .await
        .unwrap();
    assert_eq!(created.id, ScheduleId::new("sch_4"));
    assert!(cache.is_stale(&key));

    let _: QueryState<Vec<ClassSchedule>> = cache.refetch(&key, || {
        let api = api.clone();
        let id = class_id.clone();
        async move { api.list_class_schedules(&id).await }
    });
    let _: QueryState<Vec<ClassSchedule>> = cache.settled(&key).await;
    assert!(!cache.is_stale(&key));

    ClassSchedules::delete(&api, &cache)
        .execute((class_id.clone(), ScheduleId::new("sch_2")))
        .await
        .unwrap();
    assert!(cache.is_stale(&key));
}

#[tokio::test]
async fn diagnostic_results_put_lowest_scores_first() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/diagnostic-tests/dt_1/results",
        &serde_json::json!([
            { "studentId": "stu_1", "studentName": "Ada Lovelace", "score": 88.0, "skillGaps": null },
            { "studentId": "stu_2", "studentName": "Alan Turing", "score": 41.5, "skillGaps": ["Fractions"] }
        ]),
    )
    .await;

    let cache = QueryCache::new();
    let api = signed_in_client(&base_url(&server), "tok-1");
    let test_id = DiagnosticTestId::new("dt_1");

    DiagnosticResults::read(&api, &cache, &test_id);
    let results: QueryState<Vec<DiagnosticResult>> = cache.settled(&DiagnosticResults::key(&test_id)).await;
    let results = results.data().unwrap();
    assert_eq!(results[0].student_id, StudentId::new("stu_2"));
    assert_eq!(results[0].skill_gaps, vec!["Fractions".to_string()]);
    assert!(results[1].skill_gaps.is_empty());
}

#[tokio::test]
async fn year_groups_are_read_once_through_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/year-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "Y7", "name": "Year 7" },
            { "id": "Y8", "name": "Year 8" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let api = signed_in_client(&base_url(&server), "tok-1");

    assert!(YearGroups::read(&api, &cache).is_loading());
    let groups: QueryState<Vec<YearGroup>> = cache.settled(&YearGroups::key()).await;
    assert_eq!(groups.data().map(Vec::len), Some(2));

    let again = YearGroups::read(&api, &cache);
    assert_eq!(again.data().unwrap()[1].name, "Year 8");
}
