//! Tests for complaint HTTP handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, body::MessageBody, http::StatusCode, test as actix_test, web};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::FixtureUserDirectory;
use crate::domain::{ComplaintService, IdentityService};
use crate::inbound::http::auth::{login, register};

struct TestStack {
    state: HttpState,
    attachments: Arc<crate::domain::ports::FixtureAttachmentStore>,
}

fn test_stack() -> TestStack {
    let identity = Arc::new(IdentityService::new(Arc::new(
        FixtureUserDirectory::default(),
    )));
    let attachments = Arc::new(crate::domain::ports::FixtureAttachmentStore::default());
    let complaints = Arc::new(ComplaintService::new(
        Arc::new(crate::domain::ports::FixtureComplaintRepository::default()),
        Arc::clone(&attachments),
    ));
    TestStack {
        state: HttpState {
            login: Arc::clone(&identity) as _,
            registration: Arc::clone(&identity) as _,
            identities: identity,
            complaints: Arc::clone(&complaints) as _,
            complaints_query: complaints,
        },
        attachments,
    }
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(login)
                // The guarded multipart route must come before the JSON one.
                .service(create_complaint_multipart)
                .service(create_complaint)
                .service(list_my_complaints)
                .service(list_complaints)
                .service(update_complaint_status),
        )
}

async fn login_session<S, B>(app: &S, email: &str, role: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let register_res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "name": "Test User",
                "email": email,
                "password": "secret1",
                "role": role,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(register_res.status(), StatusCode::CREATED);

    let login_res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": "secret1" }))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

fn complaint_json(category: &str, description: &str) -> Value {
    json!({
        "category": category,
        "description": description,
        "priority": "High",
    })
}

#[actix_web::test]
async fn create_without_session_is_unauthorised() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/complaints")
            .set_json(complaint_json("Plumbing", "The shower drain is blocked."))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn student_creates_a_pending_complaint() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let cookie = login_session(&app, "student@example.com", "student").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/complaints")
            .cookie(cookie)
            .set_json(complaint_json("Plumbing", "The shower drain is blocked."))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["category"], "Plumbing");
    assert_eq!(body["priority"], "High");
    assert!(body["attachmentRef"].is_null());
    assert!(body.get("createdAt").is_some());
    assert!(body.get("created_at").is_none());
    assert!(body["owner"]["email"].is_string());
}

#[actix_web::test]
async fn admin_cannot_create_complaints() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let cookie = login_session(&app, "admin@example.com", "admin").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/complaints")
            .cookie(cookie)
            .set_json(complaint_json("Plumbing", "The shower drain is blocked."))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn listing_is_scoped_by_role() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let first = login_session(&app, "first@example.com", "student").await;
    let second = login_session(&app, "second@example.com", "student").await;
    let admin = login_session(&app, "admin@example.com", "admin").await;

    for (cookie, description) in [
        (&first, "The corridor light is flickering."),
        (&second, "The kitchen tap will not close."),
    ] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/complaints")
                .cookie(cookie.clone())
                .set_json(complaint_json("Electrical", description))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mine = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints/my")
            .cookie(first)
            .to_request(),
    )
    .await;
    assert_eq!(mine.status(), StatusCode::OK);
    let mine: Value = serde_json::from_slice(&actix_test::read_body(mine).await).expect("json");
    assert_eq!(mine["count"], 1);
    assert_eq!(
        mine["complaints"][0]["description"],
        "The corridor light is flickering."
    );
    assert!(mine.get("filters").is_none());

    let all = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(all.status(), StatusCode::OK);
    let all: Value = serde_json::from_slice(&actix_test::read_body(all).await).expect("json");
    assert_eq!(all["count"], 2);
    // Newest first.
    assert_eq!(
        all["complaints"][0]["description"],
        "The kitchen tap will not close."
    );
}

#[actix_web::test]
async fn students_cannot_use_the_full_listing() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let student = login_session(&app, "student@example.com", "student").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints")
            .cookie(student.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Role is checked before the filters, so garbage values change nothing.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints?status=Garbage")
            .cookie(student)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admins_cannot_use_the_own_records_listing() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let admin = login_session(&app, "admin@example.com", "admin").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints/my")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_listing_applies_filters() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let student = login_session(&app, "student@example.com", "student").await;
    let admin = login_session(&app, "admin@example.com", "admin").await;

    for category in ["Plumbing", "Electrical"] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/complaints")
                .cookie(student.clone())
                .set_json(complaint_json(category, "Something here needs fixing."))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints?category=Electrical&status=Pending")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
    assert_eq!(body["count"], 1);
    assert_eq!(body["complaints"][0]["category"], "Electrical");
    // The applied filters are echoed back.
    assert_eq!(body["filters"]["category"], "Electrical");
    assert_eq!(body["filters"]["status"], "Pending");
}

#[actix_web::test]
async fn unknown_filter_values_are_rejected() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let admin = login_session(&app, "admin@example.com", "admin").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/complaints?status=In%20Progress")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
    assert_eq!(body["code"], "invalid_filter");
}

#[actix_web::test]
async fn admin_moves_a_complaint_through_statuses() {
    let app = actix_test::init_service(test_app(test_stack().state)).await;
    let student = login_session(&app, "student@example.com", "student").await;
    let admin = login_session(&app, "admin@example.com", "admin").await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/complaints")
            .cookie(student.clone())
            .set_json(complaint_json("Cleaning", "The common room needs a clean."))
            .to_request(),
    )
    .await;
    let created: Value =
        serde_json::from_slice(&actix_test::read_body(created).await).expect("json");
    let id = created["id"].as_i64().expect("complaint id");

    let forbidden = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/complaints/{id}"))
            .cookie(student)
            .set_json(json!({ "status": "Resolved" }))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let updated = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/complaints/{id}"))
            .cookie(admin.clone())
            .set_json(json!({ "status": "InProgress" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value =
        serde_json::from_slice(&actix_test::read_body(updated).await).expect("json");
    assert_eq!(updated["status"], "InProgress");

    let invalid = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/complaints/{id}"))
            .cookie(admin.clone())
            .set_json(json!({ "status": "Closed" }))
            .to_request(),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let invalid: Value =
        serde_json::from_slice(&actix_test::read_body(invalid).await).expect("json");
    assert_eq!(invalid["code"], "invalid_status");

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/complaints/999")
            .cookie(admin)
            .set_json(json!({ "status": "Resolved" }))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

fn multipart_body(boundary: &str, file_name: &str, content_type: &str) -> String {
    let mut body = String::new();
    for (name, value) in [
        ("category", "Plumbing"),
        ("description", "Water pools under the sink cabinet."),
        ("priority", "Low"),
    ] {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\nnot-really-image-bytes\r\n--{boundary}--\r\n"
    ));
    body
}

#[actix_web::test]
async fn multipart_create_stores_the_attachment() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(stack.state)).await;
    let student = login_session(&app, "student@example.com", "student").await;

    let boundary = "complaints-test-boundary";
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/complaints")
            .cookie(student)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(boundary, "leak.png", "image/png"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
    assert_eq!(body["priority"], "Low");
    let reference = body["attachmentRef"].as_str().expect("attachment ref");
    assert!(reference.ends_with(".png"));
    assert!(stack.attachments.contains(reference));
}

#[actix_web::test]
async fn multipart_create_rejects_non_image_parts() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(stack.state)).await;
    let student = login_session(&app, "student@example.com", "student").await;

    let boundary = "complaints-test-boundary";
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/complaints")
            .cookie(student)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(boundary, "notes.pdf", "application/pdf"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
    assert_eq!(body["code"], "unsupported_media_type");
    assert!(stack.attachments.is_empty());
}
