#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response};
use axum::Router;
use campusgate::config::{extract_config, ConfigV1};
use campusgate::routes::create_router;
use campusgate::startup::build_state;
use campusgate::state::AppState;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;

/// Test config with every Firebase endpoint pointed at `backend_url`.
pub fn load_test_config(backend_url: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
firebase:
  api_key: "test-key"
  auth_domain: "demo.firebaseapp.com"
  project_id: "demo"
  storage_bucket: "demo.appspot.com"
  messaging_sender_id: "1234"
  app_id: "1:1234:web:abcd"
  auth_endpoint: "{url}"
  firestore_endpoint: "{url}"
  storage_endpoint: "{url}"
logging:
  level: "debug"
  format: "json"
bind_address: 127.0.0.1:0
cleanup:
  collection: "assignments"
  page_size: 100
"#,
        url = backend_url
    );

    extract_config(Figment::new().merge(Yaml::string(&yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: ConfigV1) -> (Router, AppState) {
    let state = build_state(Arc::new(config)).expect("test config should initialize");
    (create_router(state.clone()), state)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header missing")
        .to_str()
        .expect("Location header not valid UTF-8")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
