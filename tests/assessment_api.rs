//! Wellness questionnaire endpoints and score bounds.

mod common;

use axum::http::StatusCode;
use common::{app_with_stub_reply, body_json, get, post_json, register_user};
use wellspring_server::assessment::QUESTIONS;

fn answers_at(pick: impl Fn(&'static [i32]) -> i32) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = QUESTIONS
        .iter()
        .map(|q| (q.id.to_string(), serde_json::json!(pick(q.options))))
        .collect();
    serde_json::Value::Object(map)
}

#[tokio::test]
async fn all_minimum_answers_score_100() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "assess_min").await;

    let body = serde_json::json!({ "answers": answers_at(|opts| opts[0]) });
    let response = post_json(&app, "/assessments", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["score"], 100);
}

#[tokio::test]
async fn all_maximum_answers_score_0() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "assess_max").await;

    let body = serde_json::json!({ "answers": answers_at(|opts| *opts.last().unwrap()) });
    let response = post_json(&app, "/assessments", body, Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["score"], 0);
}

#[tokio::test]
async fn partial_submission_is_a_validation_error() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "assess_partial").await;

    let mut answers = answers_at(|opts| opts[0]);
    answers.as_object_mut().unwrap().remove("q3");
    let body = serde_json::json!({ "answers": answers });
    let response = post_json(&app, "/assessments", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_answer_is_a_validation_error() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "assess_range").await;

    let mut answers = answers_at(|opts| opts[0]);
    answers
        .as_object_mut()
        .unwrap()
        .insert("q1".to_string(), serde_json::json!(42));
    let body = serde_json::json!({ "answers": answers });
    let response = post_json(&app, "/assessments", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn latest_returns_the_most_recent_assessment() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "assess_latest").await;

    let first = serde_json::json!({ "answers": answers_at(|opts| *opts.last().unwrap()) });
    post_json(&app, "/assessments", first, Some(&cookie)).await;

    let second = serde_json::json!({ "answers": answers_at(|opts| opts[0]) });
    post_json(&app, "/assessments", second, Some(&cookie)).await;

    let response = get(&app, "/assessments/latest", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 100);
}

#[tokio::test]
async fn latest_is_not_found_without_any_assessment() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "assess_none").await;

    let response = get(&app, "/assessments/latest", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
