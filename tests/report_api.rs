//! Weekly report windowing and aggregation over the HTTP surface.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{app_with_stub_reply, body_json, get, post_json, register_user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use wellspring_server::entities::{exercise_completion, mood};

async fn insert_mood_at(
    db: &DatabaseConnection,
    user_id: i32,
    intensity: i32,
    days_ago: i64,
) {
    mood::ActiveModel {
        user_id: Set(user_id),
        mood: Set("neutral".to_string()),
        intensity: Set(intensity),
        note: Set(None),
        created_at: Set(Utc::now().naive_utc() - Duration::days(days_ago)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn entries_older_than_seven_days_are_excluded() {
    let (app, db) = app_with_stub_reply("hi").await;
    let (cookie, user_id) = register_user(&app, "window").await;

    insert_mood_at(&db, user_id, 3, 8).await; // outside the window
    insert_mood_at(&db, user_id, 4, 6).await; // inside the window

    let response = get(&app, "/reports/weekly", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["mood_data"]["entries"], 1);
    assert_eq!(json["mood_data"]["average_intensity"], 4.0);
    assert_eq!(json["mood_data"]["trend"], "not enough data");
}

#[tokio::test]
async fn trend_reflects_first_versus_last_entry_in_window() {
    let (app, db) = app_with_stub_reply("hi").await;
    let (cookie, user_id) = register_user(&app, "trend").await;

    insert_mood_at(&db, user_id, 2, 5).await;
    insert_mood_at(&db, user_id, 3, 3).await;
    insert_mood_at(&db, user_id, 5, 1).await;

    let response = get(&app, "/reports/weekly", Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["mood_data"]["entries"], 3);
    assert_eq!(json["mood_data"]["trend"], "improving");
}

#[tokio::test]
async fn exercise_metrics_sum_minutes_and_group_by_type() {
    let (app, db) = app_with_stub_reply("hi").await;
    let (cookie, user_id) = register_user(&app, "exreport").await;

    for (exercise_type, seconds, days_ago) in
        [("breathing", 300, 1), ("breathing", 300, 2), ("mindfulness", 600, 3)]
    {
        exercise_completion::ActiveModel {
            user_id: Set(user_id),
            exercise_id: Set(None),
            exercise_type: Set(exercise_type.to_string()),
            duration_seconds: Set(seconds),
            notes: Set(None),
            xp_earned: Set(seconds / 6),
            created_at: Set(Utc::now().naive_utc() - Duration::days(days_ago)),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let response = get(&app, "/reports/weekly", Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["exercise_data"]["count"], 3);
    assert_eq!(json["exercise_data"]["total_minutes"], 20);
    assert_eq!(json["exercise_data"]["by_type"]["breathing"], 2);
    assert_eq!(json["exercise_data"]["by_type"]["mindfulness"], 1);
    assert!(json["insights"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i.as_str().unwrap().contains("Great consistency")));
}

#[tokio::test]
async fn goal_counts_are_all_time_not_windowed() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "goalreport").await;

    let response = post_json(
        &app,
        "/goals",
        serde_json::json!({"title": "Read nightly"}),
        Some(&cookie),
    )
    .await;
    let goal_id = body_json(response).await["goal"]["id"].as_i64().unwrap();
    post_json(&app, "/goals", serde_json::json!({"title": "Walk"}), Some(&cookie)).await;

    common::patch_json(
        &app,
        &format!("/goals/{goal_id}"),
        serde_json::json!({"completed": true}),
        Some(&cookie),
    )
    .await;

    let response = get(&app, "/reports/weekly", Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["goal_data"]["total"], 2);
    assert_eq!(json["goal_data"]["completed"], 1);
    assert_eq!(json["goal_data"]["in_progress"], 1);
}

#[tokio::test]
async fn empty_week_still_produces_insights() {
    let (app, _db) = app_with_stub_reply("hi").await;
    let (cookie, _) = register_user(&app, "emptyweek").await;

    let response = get(&app, "/reports/weekly", Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["mood_data"]["entries"], 0);
    assert!(json["mood_data"]["average_intensity"].is_null());
    let insights = json["insights"].as_array().unwrap();
    assert!(insights
        .iter()
        .any(|i| i.as_str().unwrap().contains("No mood entries")));
    assert!(insights
        .iter()
        .any(|i| i.as_str().unwrap().contains("No exercises")));
}
