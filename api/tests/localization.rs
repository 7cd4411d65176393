mod common;

use axum::http::StatusCode;
use common::KurdMedContext;
use serde_json::Value;
use test_context::test_context;

#[test_context(KurdMedContext)]
#[tokio::test]
async fn test_kurdish_catalog_is_right_to_left(ctx: &mut KurdMedContext) {
    let response = ctx.server.get("/locales/ku").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["language"], "ku");
    assert_eq!(body["direction"], "rtl");
    assert!(body["data"]["aiChatbot.initialMessage"].is_string());
}

#[test_context(KurdMedContext)]
#[tokio::test]
async fn test_english_catalog(ctx: &mut KurdMedContext) {
    let body = ctx.server.get("/locales/en").await.json::<Value>();

    assert_eq!(body["direction"], "ltr");
    assert_eq!(
        body["data"]["nameSearch.error.enterName"],
        "Please enter a medication name."
    );
}

#[test_context(KurdMedContext)]
#[tokio::test]
async fn test_unknown_language_is_not_found(ctx: &mut KurdMedContext) {
    ctx.server
        .get("/locales/fr")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(KurdMedContext)]
#[tokio::test]
async fn test_health(ctx: &mut KurdMedContext) {
    let body = ctx.server.get("/health").await.json::<Value>();
    assert_eq!(body["status"], "ok");
}
