#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use overlord_api::{
    config::{ApiConfig, AuthConfig},
    construct_router,
    state::{AppState, State},
    store::MemoryReportStore,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "hunter2";

pub fn test_config() -> ApiConfig {
    ApiConfig::new(AuthConfig::new(
        ADMIN_USERNAME,
        ADMIN_PASSWORD,
        "test-secret",
        60,
    ))
}

pub fn app_with(config: ApiConfig) -> (Router, AppState) {
    let state: AppState = Arc::new(State::new(config, Arc::new(MemoryReportStore::new())));
    (construct_router(state.clone()), state)
}

pub fn app() -> (Router, AppState) {
    app_with(test_config())
}

pub fn valid_report() -> Value {
    json!({
        "domain": "whatever.com",
        "errorText": "Uncaught TypeError: x is undefined",
        "url": "https://whatever.com/app",
        "filename": "app.js",
        "line": 42,
        "column": 7,
        "datetime": "2023-10-02T15:04:05Z",
        "userAgent": "Mozilla/5.0 (Linux; U; Android 7.1.2; en-us; AFTM Build/NS6265) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Mobile Safari/537.36",
        "stackTrace": "at app.js:42:7"
    })
}

pub fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn login(app: &Router) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
