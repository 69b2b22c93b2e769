mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{bearer, model_reply, TestApp, ENDPOINT};

#[actix_rt::test]
async fn test_relay_returns_model_text() {
    let test_app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_json(json!({ "contents": [{ "parts": [{ "text": "Say hi" }] }] })))
        .respond_with(model_reply("hi"))
        .expect(1)
        .mount(&test_app.server)
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/gemini")
        .insert_header(bearer("user-1"))
        .set_json(json!({ "prompt": "Say hi" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "text": "hi" }));
}

#[actix_rt::test]
async fn test_relay_hides_upstream_failure() {
    let test_app = TestApp::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded for key"))
        .expect(1)
        .mount(&test_app.server)
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/gemini")
        .insert_header(bearer("user-1"))
        .set_json(json!({ "prompt": "Say hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Gemini API request failed" }));
}

#[actix_rt::test]
async fn test_relay_rejects_blank_prompt() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/gemini")
        .insert_header(bearer("user-1"))
        .set_json(json!({ "prompt": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_relay_requires_auth() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/gemini")
        .set_json(json!({ "prompt": "Say hi" }))
        .to_request();
    match test::try_call_service(&app, req).await {
        Ok(resp) => assert_eq!(resp.status(), StatusCode::UNAUTHORIZED),
        Err(err) => assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        ),
    }
}
