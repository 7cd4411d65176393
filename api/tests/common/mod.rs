#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderName, HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use axum_test::TestServer;
use clap::Parser;
use kurdmed_api::{
    application::http::server::http_server::{router, state},
    args::Args,
};
use serde_json::json;
use test_context::AsyncTestContext;

pub const PARACETAMOL: &str = r#"{"name":"Paracetamol","description":"Pain reliever","activeIngredients":["Paracetamol 500mg"],"dosage":"1 tablet","uses":["pain","fever"],"sideEffects":["nausea"],"disclaimer":"Consult a doctor."}"#;

/// Port with nothing listening on it.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn device(id: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-device-id"),
        HeaderValue::from_static(id),
    )
}

fn candidate(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

async fn gemini(Path(rest): Path<String>) -> Response {
    if rest.contains("streamGenerateContent") {
        let body: String = ["Hel", "lo"]
            .iter()
            .map(|text| format!("data: {}\r\n\r\n", candidate(text)))
            .collect();
        ([(CONTENT_TYPE, "text/event-stream")], body).into_response()
    } else {
        Json(candidate(PARACETAMOL)).into_response()
    }
}

async fn firebase() -> Json<serde_json::Value> {
    Json(json!({
        "localId": "uid-1",
        "email": "ava@example.com",
        "displayName": "Ava",
        "photoUrl": null
    }))
}

/// Serves the Gemini and Identity Toolkit endpoints on an ephemeral port.
pub async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/v1beta/models/{*rest}", post(gemini))
        .route("/v1/{*rest}", post(firebase));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub async fn test_server(gemini_base_url: &str, firebase_api_key: &str, upstream: &str) -> TestServer {
    let args = Args::parse_from([
        "kurdmed-api",
        "--gemini-api-key",
        "test-key",
        "--gemini-base-url",
        gemini_base_url,
        "--firebase-api-key",
        firebase_api_key,
        "--firebase-base-url",
        upstream,
    ]);

    let app_state = state(Arc::new(args)).await.unwrap();
    TestServer::new(router(app_state).unwrap()).unwrap()
}

pub struct KurdMedContext {
    pub server: TestServer,
}

impl AsyncTestContext for KurdMedContext {
    async fn setup() -> Self {
        let upstream = spawn_upstream().await;
        let server = test_server(&upstream, "test-key", &upstream).await;

        Self { server }
    }
}

impl KurdMedContext {
    /// Signs the device in and returns its session token.
    pub async fn sign_in(&self, device_id: &'static str) -> String {
        let (name, value) = device(device_id);
        let response = self
            .server
            .post("/auth/sign-in")
            .add_header(name, value)
            .authorization_bearer("google-id-token")
            .await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        body["sessionToken"].as_str().unwrap().to_string()
    }
}
