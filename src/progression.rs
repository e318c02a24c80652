//! The single place where XP, level, and streak arithmetic happens.
//!
//! Every qualifying user action (mood log, exercise completion, journal
//! entry, goal events, affirmation save, badge grant) flows through one
//! [`Progression`] method. Each invocation is a single read-modify-write of
//! the user row, serialized per user with an in-process async mutex so two
//! concurrent events for the same user cannot lose an update. Invariant held
//! after every award: `level == xp / 100 + 1`, and level never decreases.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set, SqlErr,
};
use tokio::sync::Mutex;

use crate::entities::{
    achievement, exercise_completion, journal_entry, mood, user, user_achievement, Achievement,
    ExerciseCompletion, JournalEntry, Mood, User, UserAchievement,
};

pub const XP_PER_LEVEL: i32 = 100;
pub const MOOD_XP: i32 = 10;
pub const JOURNAL_XP: i32 = 15;
pub const GOAL_CREATION_XP: i32 = 15;
pub const GOAL_COMPLETION_XP: i32 = 30;
pub const AFFIRMATION_XP: i32 = 10;

pub fn level_for_xp(xp: i32) -> i32 {
    xp / XP_PER_LEVEL + 1
}

/// XP for an exercise: the caller's explicit value if given, otherwise
/// 10 XP per minute with fractional minutes rounded.
pub fn resolve_exercise_xp(duration_seconds: i32, explicit_xp: Option<i32>) -> i32 {
    explicit_xp.unwrap_or_else(|| (duration_seconds as f64 / 60.0 * 10.0).round() as i32)
}

/// True if the dates contain a run of 7 consecutive calendar days ending at
/// the most recent date.
pub fn has_seven_consecutive_days(mut dates: Vec<NaiveDate>) -> bool {
    dates.sort();
    dates.dedup();
    let mut run = 1;
    for pair in dates.windows(2).rev() {
        if pair[1] == pair[0] + Days::new(1) {
            run += 1;
            if run >= 7 {
                return true;
            }
        } else {
            break;
        }
    }
    run >= 7
}

#[derive(Debug)]
pub struct AwardOutcome {
    pub user: user::Model,
    pub xp_awarded: i32,
    pub unlocked: Vec<achievement::Model>,
}

enum Event {
    Mood,
    Journal,
    GoalCreated,
    GoalCompleted,
    Affirmation,
    Exercise {
        duration_seconds: i32,
        explicit_xp: Option<i32>,
    },
    Grant {
        achievement_id: i32,
    },
}

fn candidate_badges(event: &Event) -> &'static [&'static str] {
    match event {
        Event::Mood => &["mood-master"],
        Event::Journal => &["journal-master"],
        Event::Exercise { .. } => &["7-day-streak", "mindfulness", "breath-master", "cbt-champion"],
        _ => &[],
    }
}

#[derive(Clone)]
pub struct Progression {
    db: DatabaseConnection,
    locks: Arc<Mutex<HashMap<i32, Arc<Mutex<()>>>>>,
}

impl Progression {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn award_for_mood(&self, user_id: i32) -> Result<AwardOutcome, DbErr> {
        self.apply(user_id, Event::Mood).await
    }

    pub async fn award_for_journal(&self, user_id: i32) -> Result<AwardOutcome, DbErr> {
        self.apply(user_id, Event::Journal).await
    }

    pub async fn award_for_goal_creation(&self, user_id: i32) -> Result<AwardOutcome, DbErr> {
        self.apply(user_id, Event::GoalCreated).await
    }

    /// Call only when a goal's `completed` field transitions false -> true.
    /// The caller compares the stored value against the requested update;
    /// re-saving an already-completed goal must not reach this method.
    pub async fn award_for_goal_completion(&self, user_id: i32) -> Result<AwardOutcome, DbErr> {
        self.apply(user_id, Event::GoalCompleted).await
    }

    pub async fn award_for_affirmation(&self, user_id: i32) -> Result<AwardOutcome, DbErr> {
        self.apply(user_id, Event::Affirmation).await
    }

    pub async fn award_for_exercise(
        &self,
        user_id: i32,
        duration_seconds: i32,
        explicit_xp: Option<i32>,
    ) -> Result<AwardOutcome, DbErr> {
        self.apply(
            user_id,
            Event::Exercise {
                duration_seconds,
                explicit_xp,
            },
        )
        .await
    }

    /// Manual badge grant; idempotent per (user, badge). A repeat grant is a
    /// no-op with zero XP awarded.
    pub async fn award_for_achievement(
        &self,
        user_id: i32,
        achievement_id: i32,
    ) -> Result<AwardOutcome, DbErr> {
        self.apply(user_id, Event::Grant { achievement_id }).await
    }

    async fn lock_for(&self, user_id: i32) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(user_id).or_default().clone()
    }

    async fn apply(&self, user_id: i32, event: Event) -> Result<AwardOutcome, DbErr> {
        let lock = self.lock_for(user_id).await;
        let _guard = lock.lock().await;

        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {user_id}")))?;

        let now = Utc::now().naive_utc();
        let mut xp_awarded = 0;
        let mut streak = user.current_streak;
        let mut last_active = user.last_active;
        let mut unlocked = Vec::new();

        match &event {
            Event::Mood => xp_awarded += MOOD_XP,
            Event::Journal => xp_awarded += JOURNAL_XP,
            Event::GoalCreated => xp_awarded += GOAL_CREATION_XP,
            Event::GoalCompleted => xp_awarded += GOAL_COMPLETION_XP,
            Event::Affirmation => xp_awarded += AFFIRMATION_XP,
            Event::Exercise {
                duration_seconds,
                explicit_xp,
            } => {
                xp_awarded += resolve_exercise_xp(*duration_seconds, *explicit_xp);
                // The streak increments at most once per calendar day, no
                // matter how many exercises are logged that day.
                if last_active.date() != now.date() {
                    streak += 1;
                }
                last_active = now;
            }
            Event::Grant { achievement_id } => {
                let def = Achievement::find_by_id(*achievement_id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| {
                        DbErr::RecordNotFound(format!("achievement {achievement_id}"))
                    })?;
                if self.try_unlock(user_id, def.id, now).await? {
                    xp_awarded += def.xp_reward;
                    unlocked.push(def);
                }
            }
        }

        for &code in candidate_badges(&event) {
            let Some(def) = Achievement::find()
                .filter(achievement::Column::Code.eq(code))
                .one(&self.db)
                .await?
            else {
                continue;
            };
            let held = UserAchievement::find()
                .filter(user_achievement::Column::UserId.eq(user_id))
                .filter(user_achievement::Column::AchievementId.eq(def.id))
                .count(&self.db)
                .await?
                > 0;
            if held || !self.predicate_holds(user_id, code, streak).await? {
                continue;
            }
            if self.try_unlock(user_id, def.id, now).await? {
                xp_awarded += def.xp_reward;
                unlocked.push(def);
            }
        }

        let new_xp = user.xp + xp_awarded;
        let new_level = level_for_xp(new_xp).max(user.level);

        let mut active = user.into_active_model();
        active.xp = Set(new_xp);
        active.level = Set(new_level);
        active.current_streak = Set(streak);
        active.last_active = Set(last_active);
        let updated = active.update(&self.db).await?;

        if xp_awarded > 0 {
            tracing::info!(
                user_id,
                xp_awarded,
                xp = updated.xp,
                level = updated.level,
                unlocked = unlocked.len(),
                "progression updated"
            );
        }

        Ok(AwardOutcome {
            user: updated,
            xp_awarded,
            unlocked,
        })
    }

    /// Insert the unlock row; the unique (user, badge) index makes a repeat
    /// attempt a no-op rather than a double award.
    async fn try_unlock(
        &self,
        user_id: i32,
        achievement_id: i32,
        now: chrono::NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let row = user_achievement::ActiveModel {
            user_id: Set(user_id),
            achievement_id: Set(achievement_id),
            unlocked_at: Set(now),
            ..Default::default()
        };
        match row.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn predicate_holds(
        &self,
        user_id: i32,
        code: &str,
        streak: i32,
    ) -> Result<bool, DbErr> {
        match code {
            "7-day-streak" => Ok(streak >= 7),
            "journal-master" => {
                let count = JournalEntry::find()
                    .filter(journal_entry::Column::UserId.eq(user_id))
                    .count(&self.db)
                    .await?;
                Ok(count >= 5)
            }
            "mindfulness" => self.completion_count_at_least(user_id, "mindfulness", 1).await,
            "breath-master" => self.completion_count_at_least(user_id, "breathing", 3).await,
            "cbt-champion" => self.completion_count_at_least(user_id, "cognitive", 5).await,
            "mood-master" => {
                let moods = Mood::find()
                    .filter(mood::Column::UserId.eq(user_id))
                    .all(&self.db)
                    .await?;
                let dates = moods.iter().map(|m| m.created_at.date()).collect();
                Ok(has_seven_consecutive_days(dates))
            }
            _ => Ok(false),
        }
    }

    async fn completion_count_at_least(
        &self,
        user_id: i32,
        exercise_type: &str,
        threshold: u64,
    ) -> Result<bool, DbErr> {
        let count = ExerciseCompletion::find()
            .filter(exercise_completion::Column::UserId.eq(user_id))
            .filter(exercise_completion::Column::ExerciseType.eq(exercise_type))
            .count(&self.db)
            .await?;
        Ok(count >= threshold)
    }
}
