use sea_orm_migration::prelude::*;

mod m20260115_000001_create_users_and_moods;
mod m20260115_000002_create_exercises;
mod m20260116_000001_create_journals_goals_affirmations;
mod m20260117_000001_create_achievements_chat_assessments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_create_users_and_moods::Migration),
            Box::new(m20260115_000002_create_exercises::Migration),
            Box::new(m20260116_000001_create_journals_goals_affirmations::Migration),
            Box::new(m20260117_000001_create_achievements_chat_assessments::Migration),
        ]
    }
}
