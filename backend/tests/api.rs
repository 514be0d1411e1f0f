//! HTTP-level tests for the document service: session handling, template
//! management and the generate / download / delete cycle.
//!
//! Each test runs against its own scratch data directory with the seeded
//! administrator (`admin` / `admin`).

use actix_web::cookie::{time::Duration, Cookie};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use backend::config::AppConfig;
use backend::storage::SESSION_TTL_HOURS;
use backend::{build_state, configure_app};
use serde_json::{json, Value};
use std::io::Cursor;
use tempfile::TempDir;

const BOUNDARY: &str = "edudoc-test-boundary";

// ── App builder ────────────────────────────────────────────────

fn test_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config
}

macro_rules! test_app {
    ($dir:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(build_state(test_config($dir)).unwrap()))
                .configure(configure_app),
        )
        .await
    };
}

macro_rules! login {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "admin", "password": "admin" }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie: Cookie<'static> = resp
            .response()
            .cookies()
            .find(|c| c.name() == "edudoc_session")
            .expect("session cookie")
            .into_owned();
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(cookie.max_age(), Some(Duration::hours(SESSION_TTL_HOURS)));
        cookie
    }};
}

macro_rules! create_template {
    ($app:expr, $cookie:expr, $name:expr, $text:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/templates")
            .cookie($cookie.clone())
            .set_json(json!({ "name": $name, "description": "", "template_text": $text }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["id"].as_i64().unwrap()
    }};
}

// ── Multipart helpers ──────────────────────────────────────────

fn multipart(fields: &[(&str, &str)], signature: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = signature {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"signature\"; filename=\"sig.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn generate_request(
    template_id: i64,
    cookie: Option<&Cookie<'static>>,
    body: Vec<u8>,
) -> test::TestRequest {
    let mut req = test::TestRequest::post()
        .uri(&format!("/api/templates/{template_id}/generate"))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    req
}

fn signature_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(200, 80, image::Rgba([0, 0, 0, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

// ── Tests ──────────────────────────────────────────────────────

#[actix_web::test]
async fn health_and_dashboard_are_public() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["templates"].as_array().unwrap().len(), 3);
    assert_eq!(body["generated_count"], 0);
    assert_eq!(body["today_count"], 0);
}

#[actix_web::test]
async fn protected_routes_require_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);

    for uri in ["/api/templates", "/api/templates/1", "/api/generated", "/api/generated/1/download"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let forged = Cookie::new("edudoc_session", "forged");
    let req = test::TestRequest::get()
        .uri("/api/templates")
        .cookie(forged.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, generate_request(1, Some(&forged), multipart(&[], None)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "authentication required");
}

#[actix_web::test]
async fn wrong_password_is_rejected_and_logout_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "admin", "password": "nope" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let cookie = login!(&app);
    let req = test::TestRequest::get()
        .uri("/api/templates")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/templates")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn template_crud_and_variables() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);
    let cookie = login!(&app);

    let req = test::TestRequest::post()
        .uri("/api/templates")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "  ", "template_text": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "required: name, template_text");

    let id = create_template!(&app, &cookie, "Invitation", "Dear {{ name }}, see you on {{ date }}. {{ name }}");

    let req = test::TestRequest::get()
        .uri(&format!("/api/templates/{id}/variables"))
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["variables"], json!(["name", "date"]));

    let req = test::TestRequest::put()
        .uri(&format!("/api/templates/{id}"))
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Invitation v2", "description": "updated", "template_text": "{{ guest }}" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Invitation v2");

    let req = test::TestRequest::get()
        .uri("/api/templates?q=v2")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], id);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/templates/{id}"))
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/templates/{id}"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "template not found");
}

#[actix_web::test]
async fn missing_values_are_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);
    let cookie = login!(&app);
    let id = create_template!(&app, &cookie, "Greeting", "Hello, {{ name }} from {{ city }}");

    let body = multipart(&[("name", "   "), ("city", "Kazan"), ("unrelated", "x")], None);
    let resp = test::call_service(&app, generate_request(id, Some(&cookie), body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["missing"], json!(["name"]));

    let req = test::TestRequest::get()
        .uri("/api/generated")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn malformed_template_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);
    let cookie = login!(&app);
    let id = create_template!(&app, &cookie, "Broken", "Hello, {{ name }} and {{ oops");

    let resp = test::call_service(
        &app,
        generate_request(id, Some(&cookie), multipart(&[("name", "World")], None)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("document generation failed"));
}

#[actix_web::test]
async fn generate_download_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);
    let cookie = login!(&app);
    let id = create_template!(&app, &cookie, "Greeting", "**GREETING**\nHello, {{ name }}");

    let body = multipart(&[("name", "World")], Some(&signature_png()));
    let resp = test::call_service(&app, generate_request(id, Some(&cookie), body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    let doc_id: i64 = resp
        .headers()
        .get("X-Document-Id")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let pdf = test::read_body(resp).await;
    assert!(pdf.starts_with(b"%PDF"));
    assert_eq!(lopdf::Document::load_mem(&pdf).unwrap().get_pages().len(), 1);
    assert_eq!(
        std::fs::read_dir(dir.path().join("uploads/signatures")).unwrap().count(),
        1
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/generated/{doc_id}"))
        .cookie(cookie.clone())
        .to_request();
    let record: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(record["template_name"], "Greeting");
    assert_eq!(record["meta"], json!({ "name": "World" }));

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let dashboard: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dashboard["generated_count"], 1);
    assert_eq!(dashboard["today_count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/generated?q=Greet")
        .cookie(cookie.clone())
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/generated/{doc_id}/download"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    assert_eq!(test::read_body(resp).await, pdf);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/generated/{doc_id}"))
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/generated/{doc_id}/download"))
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        std::fs::read_dir(dir.path().join("uploads/pdfs")).unwrap().count(),
        0
    );
}

#[actix_web::test]
async fn deleting_a_template_removes_its_documents() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(&dir);
    let cookie = login!(&app);
    let id = create_template!(&app, &cookie, "Short", "{{ x }}");

    for value in ["one", "two"] {
        let resp = test::call_service(
            &app,
            generate_request(id, Some(&cookie), multipart(&[("x", value)], None)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(
        std::fs::read_dir(dir.path().join("uploads/pdfs")).unwrap().count(),
        2
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/templates/{id}"))
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/generated")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
    assert_eq!(
        std::fs::read_dir(dir.path().join("uploads/pdfs")).unwrap().count(),
        0
    );
}
