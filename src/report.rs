//! On-demand weekly report: a 7-day trailing window over moods, exercises,
//! and journal entries, plus all-time goal counts, summarized into fixed
//! threshold-driven insight sentences.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::entities::{
    exercise_completion, goal, journal_entry, mood, ExerciseCompletion, Goal, JournalEntry, Mood,
};

#[derive(Debug, Serialize)]
pub struct MoodData {
    pub entries: usize,
    pub average_intensity: Option<f64>,
    pub trend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ExerciseData {
    pub count: usize,
    pub total_minutes: i64,
    pub by_type: HashMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct JournalData {
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct GoalData {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub mood_data: MoodData,
    pub exercise_data: ExerciseData,
    pub journal_data: JournalData,
    pub goal_data: GoalData,
    pub insights: Vec<String>,
}

/// Moods ordered ascending by creation time within the window.
fn summarize_moods(moods: &[mood::Model]) -> MoodData {
    let entries = moods.len();
    let average_intensity = if entries == 0 {
        None
    } else {
        let sum: i32 = moods.iter().map(|m| m.intensity).sum();
        Some(sum as f64 / entries as f64)
    };
    let trend = if entries < 2 {
        "not enough data"
    } else {
        let first = moods.first().map(|m| m.intensity).unwrap_or(0);
        let last = moods.last().map(|m| m.intensity).unwrap_or(0);
        match last.cmp(&first) {
            std::cmp::Ordering::Greater => "improving",
            std::cmp::Ordering::Less => "declining",
            std::cmp::Ordering::Equal => "stable",
        }
    };
    MoodData {
        entries,
        average_intensity,
        trend,
    }
}

fn summarize_exercises(completions: &[exercise_completion::Model]) -> ExerciseData {
    let mut by_type: HashMap<String, usize> = HashMap::new();
    let mut total_seconds: i64 = 0;
    for c in completions {
        *by_type.entry(c.exercise_type.clone()).or_insert(0) += 1;
        total_seconds += c.duration_seconds as i64;
    }
    ExerciseData {
        count: completions.len(),
        total_minutes: total_seconds / 60,
        by_type,
    }
}

fn summarize_goals(goals: &[goal::Model]) -> GoalData {
    let completed = goals.iter().filter(|g| g.completed).count();
    GoalData {
        total: goals.len(),
        completed,
        in_progress: goals.len() - completed,
    }
}

/// Fixed decision table mapping metric thresholds to canned sentences,
/// ordered mood, exercise, journal, goal.
fn build_insights(
    mood_data: &MoodData,
    exercise_data: &ExerciseData,
    journal_data: &JournalData,
    goal_data: &GoalData,
) -> Vec<String> {
    let mut insights = Vec::new();

    if mood_data.entries == 0 {
        insights.push("No mood entries this week. Logging how you feel each day helps you spot patterns.".to_string());
    } else {
        match mood_data.trend {
            "improving" => insights.push("Your mood improved over the week. Whatever you are doing, it seems to be working.".to_string()),
            "declining" => insights.push("Your mood dipped over the week. A breathing or mindfulness exercise might help steady things.".to_string()),
            "stable" => insights.push("Your mood held steady this week.".to_string()),
            _ => insights.push("Log a few more moods this week to see your trend.".to_string()),
        }
    }

    if exercise_data.count == 0 {
        insights.push("No exercises completed this week. Even a two-minute breathing session counts.".to_string());
    } else if exercise_data.count >= 3 {
        insights.push(format!(
            "Great consistency: {} exercises completed this week.",
            exercise_data.count
        ));
    } else {
        insights.push(format!(
            "You completed {} exercise{} this week. Aim for three to build the habit.",
            exercise_data.count,
            if exercise_data.count == 1 { "" } else { "s" }
        ));
    }

    if journal_data.entries == 0 {
        insights.push("No journal entries this week. Writing a few lines can help untangle a busy mind.".to_string());
    } else if journal_data.entries >= 3 {
        insights.push("You journaled regularly this week. Reflection like that builds self-awareness.".to_string());
    }

    if goal_data.completed > 0 {
        insights.push(format!(
            "You have completed {} of {} goals. Nice work.",
            goal_data.completed, goal_data.total
        ));
    } else if goal_data.in_progress > 0 {
        insights.push(format!(
            "{} goal{} in progress. Small steps add up.",
            goal_data.in_progress,
            if goal_data.in_progress == 1 { " is" } else { "s are" }
        ));
    }

    insights
}

/// Compute the trailing 7-day report for a user as of `now`.
///
/// Mood/exercise/journal metrics are windowed; goal counts are all-time.
pub async fn weekly_report(
    db: &DatabaseConnection,
    user_id: i32,
    now: NaiveDateTime,
) -> Result<WeeklyReport, DbErr> {
    let window_start = now - chrono::Duration::days(7);

    let moods = Mood::find()
        .filter(mood::Column::UserId.eq(user_id))
        .filter(mood::Column::CreatedAt.gt(window_start))
        .filter(mood::Column::CreatedAt.lte(now))
        .order_by_asc(mood::Column::CreatedAt)
        .all(db)
        .await?;

    let completions = ExerciseCompletion::find()
        .filter(exercise_completion::Column::UserId.eq(user_id))
        .filter(exercise_completion::Column::CreatedAt.gt(window_start))
        .filter(exercise_completion::Column::CreatedAt.lte(now))
        .all(db)
        .await?;

    let journals = JournalEntry::find()
        .filter(journal_entry::Column::UserId.eq(user_id))
        .filter(journal_entry::Column::CreatedAt.gt(window_start))
        .filter(journal_entry::Column::CreatedAt.lte(now))
        .all(db)
        .await?;

    let goals = Goal::find()
        .filter(goal::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let mood_data = summarize_moods(&moods);
    let exercise_data = summarize_exercises(&completions);
    let journal_data = JournalData {
        entries: journals.len(),
    };
    let goal_data = summarize_goals(&goals);
    let insights = build_insights(&mood_data, &exercise_data, &journal_data, &goal_data);

    Ok(WeeklyReport {
        mood_data,
        exercise_data,
        journal_data,
        goal_data,
        insights,
    })
}
