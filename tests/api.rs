//! HTTP API integration tests. Each test runs the router in-process against
//! its own temp database.

mod common;

use axum::http::{Method, StatusCode, header};
use common::{TestApp, field};
use serde_json::json;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let resp = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn missing_or_invalid_token_is_unauthorized() {
    let app = TestApp::new();

    let resp = app.request(Method::GET, "/api/v1/attendance", None, None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(resp.headers.contains_key(header::WWW_AUTHENTICATE));

    let resp = app
        .get("/api/v1/attendance", "rollbook_00000000_000000000000000000000000")
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_api_requires_admin() {
    let app = TestApp::new();
    let (_, teacher) = app.create_account("teacher", "Teacher").await;
    let (_, admin_account) = app.create_account("admin", "Office").await;

    let resp = app.get("/api/v1/admin/accounts", &teacher).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get("/api/v1/admin/accounts", &admin_account).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn teacher_sees_only_assigned_courses() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "T").await;
    let (s1, _) = app.create_account("student", "S1").await;
    let (s2, _) = app.create_account("student", "S2").await;

    let resp = app.assign(&teacher_id, "3B", "subject", Some("Math")).await;
    assert_eq!(resp.status, StatusCode::CREATED);

    app.enroll(&s1, "3B").await;
    app.enroll(&s2, "4A").await;
    app.record_attendance(&s1, "3B").await;
    app.record_attendance(&s2, "4A").await;

    let resp = app.get("/api/v1/attendance", &teacher).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(field(resp.data(), "course"), vec!["3B"]);

    let resp = app.get("/api/v1/attendance?course=4A", &teacher).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert!(resp.error().unwrap().contains("4A"));

    let resp = app.get("/api/v1/attendance?course=3B", &teacher).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(field(resp.data(), "student_id"), vec![s1.clone()]);

    let resp = app.get("/api/v1/roster", &teacher).await;
    assert_eq!(field(resp.data(), "student_id"), vec![s1]);
}

#[tokio::test]
async fn teacher_without_assignments_sees_nothing() {
    let app = TestApp::new();
    let (_, teacher) = app.create_account("teacher", "T").await;
    let (s1, _) = app.create_account("student", "S1").await;
    app.enroll(&s1, "3B").await;
    app.record_attendance(&s1, "3B").await;

    let resp = app.get("/api/v1/attendance", &teacher).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.data().as_array().unwrap().is_empty());

    let resp = app.get("/api/v1/grades?course=3B", &teacher).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn supervisor_sees_everything() {
    let app = TestApp::new();
    let (_, supervisor) = app.create_account("supervisor", "Principal").await;
    let (s1, _) = app.create_account("student", "S1").await;
    let (s2, _) = app.create_account("student", "S2").await;
    app.enroll(&s1, "3B").await;
    app.enroll(&s2, "4A").await;
    app.record_attendance(&s1, "3B").await;
    app.record_attendance(&s2, "4A").await;

    let resp = app.get("/api/v1/attendance", &supervisor).await;
    assert_eq!(field(resp.data(), "course"), vec!["3B", "4A"]);

    let resp = app.get("/api/v1/attendance?course=4A", &supervisor).await;
    assert_eq!(field(resp.data(), "course"), vec!["4A"]);
}

#[tokio::test]
async fn homeroom_is_unique_per_course() {
    let app = TestApp::new();
    let (t1, _) = app.create_account("teacher", "T1").await;
    let (t2, _) = app.create_account("teacher", "T2").await;

    assert_eq!(
        app.assign(&t1, "3B", "homeroom", None).await.status,
        StatusCode::CREATED
    );
    let resp = app.assign(&t2, "3B", "homeroom", None).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert!(resp.error().unwrap().contains("3B"));

    assert_eq!(
        app.assign(&t2, "3B", "subject", Some("Math")).await.status,
        StatusCode::CREATED
    );

    let resp = app
        .get("/api/v1/admin/courses/3B/assignments", &app.admin_token)
        .await;
    assert_eq!(resp.data()["homeroom"]["staff_id"], t1.as_str());
    assert_eq!(field(&resp.data()["subjects"], "staff_id"), vec![t2]);
}

#[tokio::test]
async fn assignment_validation_errors() {
    let app = TestApp::new();
    let (teacher_id, _) = app.create_account("teacher", "T").await;
    let (student_id, _) = app.create_account("student", "S").await;

    let resp = app.assign(&student_id, "3B", "homeroom", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.assign("no-such-account", "3B", "homeroom", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.assign(&teacher_id, "3B", "subject", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.assign(&teacher_id, "3B", "tutor", None).await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(
        app.assign(&teacher_id, "3B", "subject", Some("Art")).await.status,
        StatusCode::CREATED
    );
    let resp = app.assign(&teacher_id, "3B", "subject", Some("Art")).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn removed_assignment_revokes_scope() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "T").await;
    app.assign(&teacher_id, "3B", "homeroom", None).await;

    let uri = format!("/api/v1/admin/accounts/{teacher_id}/assignments");
    let body = json!({ "course": "3B", "kind": "homeroom" });

    let resp = app
        .request(Method::DELETE, &uri, Some(&app.admin_token), Some(body.clone()))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app
        .request(Method::DELETE, &uri, Some(&app.admin_token), Some(body))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.get("/api/v1/attendance?course=3B", &teacher).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deactivated_assignment_is_out_of_scope() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "T").await;
    app.assign(&teacher_id, "3B", "subject", Some("Math")).await;

    let resp = app
        .request(
            Method::PATCH,
            &format!("/api/v1/admin/accounts/{teacher_id}/assignments"),
            Some(&app.admin_token),
            Some(json!({ "course": "3B", "kind": "subject", "subject": "Math", "active": false })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["active"], false);

    let resp = app.get("/api/v1/me", &teacher).await;
    assert!(resp.data()["courses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deactivated_account_cannot_authenticate_but_keeps_assignments() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "T").await;
    app.assign(&teacher_id, "3B", "homeroom", None).await;

    let resp = app
        .request(
            Method::PATCH,
            &format!("/api/v1/admin/accounts/{teacher_id}"),
            Some(&app.admin_token),
            Some(json!({ "active": false })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.get("/api/v1/attendance", &teacher).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .get(
            &format!("/api/v1/admin/accounts/{teacher_id}/assignments"),
            &app.admin_token,
        )
        .await;
    assert_eq!(field(resp.data(), "course"), vec!["3B"]);
}

#[tokio::test]
async fn guardian_sees_linked_students_and_cannot_write() {
    let app = TestApp::new();
    let (guardian_id, guardian) = app.create_account("guardian", "G").await;
    let (child, _) = app.create_account("student", "Child").await;
    let (other, _) = app.create_account("student", "Other").await;
    app.enroll(&child, "3B").await;
    app.enroll(&other, "3B").await;
    app.record_attendance(&child, "3B").await;
    app.record_attendance(&other, "3B").await;

    let resp = app
        .admin_post(
            "/guardian-links",
            json!({ "guardian_id": guardian_id, "student_id": child }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app.get("/api/v1/attendance", &guardian).await;
    assert_eq!(field(resp.data(), "student_id"), vec![child.clone()]);

    let resp = app
        .get(&format!("/api/v1/attendance?student={other}"), &guardian)
        .await;
    assert!(resp.data().as_array().unwrap().is_empty());

    let resp = app
        .post(
            "/api/v1/attendance",
            &guardian,
            json!({ "student_id": child, "course": "3B", "date": "2026-10-02", "status": "absent" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn guardian_link_requires_matching_roles() {
    let app = TestApp::new();
    let (teacher_id, _) = app.create_account("teacher", "T").await;
    let (student_id, _) = app.create_account("student", "S").await;

    let resp = app
        .admin_post(
            "/guardian-links",
            json!({ "guardian_id": teacher_id, "student_id": student_id }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teacher_writes_are_scoped_and_validated() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "T").await;
    let (s1, _) = app.create_account("student", "S1").await;
    app.assign(&teacher_id, "3B", "subject", Some("Math")).await;
    app.enroll(&s1, "3B").await;

    let grade = |course: &str, score: f64| {
        json!({
            "student_id": s1,
            "course": course,
            "subject": "Math",
            "assessment": "Quiz 1",
            "score": score,
            "max_score": 20.0
        })
    };

    let resp = app.post("/api/v1/grades", &teacher, grade("3B", 17.5)).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.data()["recorded_by"], teacher_id.as_str());

    let resp = app.post("/api/v1/grades", &teacher, grade("4A", 10.0)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.post("/api/v1/grades", &teacher, grade("3B", 25.0)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let (s2, _) = app.create_account("student", "S2").await;
    let resp = app
        .post(
            "/api/v1/attendance",
            &teacher,
            json!({ "student_id": s2, "course": "3B", "date": "2026-10-01", "status": "late" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.get("/api/v1/grades", &teacher).await;
    assert_eq!(field(resp.data(), "assessment"), vec!["Quiz 1"]);
}

#[tokio::test]
async fn materials_follow_enrollment_for_students() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "T").await;
    let (student_id, student) = app.create_account("student", "S").await;
    app.assign(&teacher_id, "3B", "homeroom", None).await;
    app.enroll(&student_id, "3B").await;

    let resp = app
        .post(
            "/api/v1/materials",
            &teacher,
            json!({ "course": "3B", "title": "Reading list" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app
        .post(
            "/api/v1/materials",
            &app.admin_token,
            json!({ "course": "4A", "title": "Lab safety" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app.get("/api/v1/materials", &student).await;
    assert_eq!(field(resp.data(), "title"), vec!["Reading list"]);

    let resp = app.get("/api/v1/materials", &teacher).await;
    assert_eq!(field(resp.data(), "title"), vec!["Reading list"]);

    let resp = app.get("/api/v1/materials?course=4A", &teacher).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn me_reports_scope() {
    let app = TestApp::new();
    let (teacher_id, teacher) = app.create_account("teacher", "Ms. T").await;
    app.assign(&teacher_id, "3B", "homeroom", None).await;
    app.assign(&teacher_id, "5C", "subject", Some("Art")).await;
    app.assign(&teacher_id, "5C", "subject", Some("Music")).await;

    let resp = app.get("/api/v1/me", &teacher).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["role"], "teacher");
    assert_eq!(resp.data()["display_name"], "Ms. T");
    assert_eq!(resp.data()["courses"], json!(["3B", "5C"]));
}

#[tokio::test]
async fn homeroom_label_requires_active_homeroom() {
    let app = TestApp::new();
    let (teacher_id, _) = app.create_account("teacher", "T").await;

    let uri = "/api/v1/admin/courses/3B/homeroom-label";
    let body = json!({ "label": "Room 12" });

    let resp = app
        .request(Method::PUT, uri, Some(&app.admin_token), Some(body.clone()))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    app.assign(&teacher_id, "3B", "homeroom", None).await;
    let resp = app
        .request(Method::PUT, uri, Some(&app.admin_token), Some(body))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["label"], "Room 12");
}

#[tokio::test]
async fn admin_cannot_delete_current_token() {
    let app = TestApp::new();
    let resp = app.get("/api/v1/admin/tokens", &app.admin_token).await;
    let token_id = resp.body["data"][0]["id"].as_str().unwrap().to_string();

    let resp = app
        .request(
            Method::DELETE,
            &format!("/api/v1/admin/tokens/{token_id}"),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}
