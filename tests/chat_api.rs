//! Chat assistant flow: provider replies, canned fallback, history order,
//! and per-user record ownership.

mod common;

use axum::http::StatusCode;
use common::{
    app_with_failing_provider, app_with_stub_reply, body_json, get, post_json, register_user,
};
use wellspring_server::ai::FALLBACK_REPLIES;

#[tokio::test]
async fn assistant_reply_is_stored_and_returned() {
    let (app, _db) = app_with_stub_reply("That sounds like progress.").await;
    let (cookie, _) = register_user(&app, "chatter").await;

    let body = serde_json::json!({"content": "I went for a walk today"});
    let response = post_json(&app, "/chat", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"]["is_user_message"], true);
    assert_eq!(json["reply"]["is_user_message"], false);
    assert_eq!(json["reply"]["content"], "That sounds like progress.");
}

#[tokio::test]
async fn provider_failure_falls_back_to_canned_reply() {
    let (app, _db) = app_with_failing_provider().await;
    let (cookie, _) = register_user(&app, "fallback").await;

    let body = serde_json::json!({"content": "Are you there?"});
    let response = post_json(&app, "/chat", body, Some(&cookie)).await;
    // The chat must never hard-fail on provider errors.
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let reply = json["reply"]["content"].as_str().unwrap();
    assert!(FALLBACK_REPLIES.contains(&reply));
}

#[tokio::test]
async fn history_is_ordered_oldest_first() {
    let (app, _db) = app_with_stub_reply("ok").await;
    let (cookie, _) = register_user(&app, "historian").await;

    post_json(&app, "/chat", serde_json::json!({"content": "first"}), Some(&cookie)).await;
    post_json(&app, "/chat", serde_json::json!({"content": "second"}), Some(&cookie)).await;

    let response = get(&app, "/chat", Some(&cookie)).await;
    let json = body_json(response).await;
    let messages = json.as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["content"], "first");
    assert_eq!(messages[0]["is_user_message"], true);
    assert_eq!(messages[1]["is_user_message"], false);
    assert_eq!(messages[2]["content"], "second");
}

#[tokio::test]
async fn chat_history_is_private_per_user() {
    let (app, _db) = app_with_stub_reply("ok").await;
    let (cookie_a, _) = register_user(&app, "alice").await;
    let (cookie_b, _) = register_user(&app, "bob").await;

    post_json(&app, "/chat", serde_json::json!({"content": "private"}), Some(&cookie_a)).await;

    let response = get(&app, "/chat", Some(&cookie_b)).await;
    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn journal_access_is_owner_only() {
    let (app, _db) = app_with_stub_reply("ok").await;
    let (cookie_a, _) = register_user(&app, "owner").await;
    let (cookie_b, _) = register_user(&app, "intruder").await;

    let body = serde_json::json!({"title": "Mine", "content": "private thoughts"});
    let response = post_json(&app, "/journals", body, Some(&cookie_a)).await;
    let journal_id = body_json(response).await["journal"]["id"].as_i64().unwrap();

    let response = get(&app, &format!("/journals/{journal_id}"), Some(&cookie_b)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, &format!("/journals/{journal_id}"), Some(&cookie_a)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generated_affirmation_uses_fallback_when_provider_is_down() {
    let (app, _db) = app_with_failing_provider().await;
    let (cookie, _) = register_user(&app, "affirmed").await;

    let response = post_json(
        &app,
        "/affirmations/generate",
        serde_json::json!({"category": "confidence"}),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category"], "confidence");
    assert!(!json["content"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn saving_an_affirmation_awards_xp_and_favorite_toggles() {
    let (app, _db) = app_with_stub_reply("ok").await;
    let (cookie, _) = register_user(&app, "collector").await;

    let body = serde_json::json!({"content": "I can handle hard days", "category": "resilience"});
    let response = post_json(&app, "/affirmations", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["progression"]["xp_awarded"], 10);
    let id = json["affirmation"]["id"].as_i64().unwrap();

    let response = common::patch_json(
        &app,
        &format!("/affirmations/{id}"),
        serde_json::json!({"favorite": true}),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["favorite"], true);

    let response = common::request(&app, "DELETE", &format!("/affirmations/{id}"), None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
