//! Startup seeding of static reference data: the guided-exercise catalog and
//! the badge definitions. Insert-only-when-empty, so reruns are no-ops.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use crate::entities::{achievement, exercise, Achievement, Exercise};

pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    seed_exercises(db).await?;
    seed_achievements(db).await
}

async fn seed_exercises(db: &DatabaseConnection) -> Result<(), DbErr> {
    if Exercise::find().count(db).await? > 0 {
        return Ok(());
    }

    let catalog = [
        (
            "Deep Breathing",
            "Slow diaphragmatic breathing to calm the nervous system.",
            "breathing",
            5,
            "wind",
        ),
        (
            "Box Breathing",
            "Inhale, hold, exhale, hold - four counts each.",
            "breathing",
            3,
            "square",
        ),
        (
            "Mindful Minute",
            "Sixty seconds of focused attention on the present moment.",
            "mindfulness",
            1,
            "clock",
        ),
        (
            "Body Scan",
            "Move attention slowly from head to toe, noticing sensations.",
            "mindfulness",
            10,
            "sparkles",
        ),
        (
            "Thought Record",
            "Write down a distressing thought and examine the evidence for and against it.",
            "cognitive",
            10,
            "brain",
        ),
        (
            "Reframe a Thought",
            "Pick one negative thought and restate it in a balanced way.",
            "cognitive",
            5,
            "refresh",
        ),
        (
            "Three Good Things",
            "List three things that went well today and why.",
            "gratitude",
            5,
            "heart",
        ),
    ];

    let rows = catalog
        .into_iter()
        .map(
            |(title, description, exercise_type, minutes, icon)| exercise::ActiveModel {
                title: Set(title.to_string()),
                description: Set(description.to_string()),
                exercise_type: Set(exercise_type.to_string()),
                duration_minutes: Set(minutes),
                // 10 XP per minute, matching the duration-based formula.
                xp_reward: Set(minutes * 10),
                icon: Set(icon.to_string()),
                ..Default::default()
            },
        )
        .collect::<Vec<_>>();

    Exercise::insert_many(rows).exec(db).await?;
    tracing::info!("seeded exercise catalog");
    Ok(())
}

async fn seed_achievements(db: &DatabaseConnection) -> Result<(), DbErr> {
    if Achievement::find().count(db).await? > 0 {
        return Ok(());
    }

    let badges = [
        (
            "mood-master",
            "Mood Master",
            "Log your mood every day for a week.",
            "Mood logged on 7 consecutive days",
        ),
        (
            "7-day-streak",
            "7-Day Streak",
            "Complete an exercise seven days in a row.",
            "Current streak of 7 or more days",
        ),
        (
            "journal-master",
            "Journal Master",
            "Write five journal entries.",
            "5 journal entries",
        ),
        (
            "mindfulness",
            "Mindful Moment",
            "Complete your first mindfulness exercise.",
            "1 mindfulness exercise completed",
        ),
        (
            "breath-master",
            "Breath Master",
            "Complete three breathing exercises.",
            "3 breathing exercises completed",
        ),
        (
            "cbt-champion",
            "CBT Champion",
            "Complete five cognitive exercises.",
            "5 cognitive exercises completed",
        ),
    ];

    let rows = badges
        .into_iter()
        .map(
            |(code, title, description, requirement)| achievement::ActiveModel {
                code: Set(code.to_string()),
                title: Set(title.to_string()),
                description: Set(description.to_string()),
                requirement: Set(requirement.to_string()),
                xp_reward: Set(25),
                ..Default::default()
            },
        )
        .collect::<Vec<_>>();

    Achievement::insert_many(rows).exec(db).await?;
    tracing::info!("seeded achievement definitions");
    Ok(())
}
