use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Exercises (catalog) Table
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exercises::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exercises::Title).string().not_null())
                    .col(ColumnDef::new(Exercises::Description).text().not_null())
                    .col(ColumnDef::new(Exercises::ExerciseType).string().not_null())
                    .col(
                        ColumnDef::new(Exercises::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exercises::XpReward).integer().not_null())
                    .col(ColumnDef::new(Exercises::Icon).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create ExerciseCompletions Table
        manager
            .create_table(
                Table::create()
                    .table(ExerciseCompletions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExerciseCompletions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExerciseCompletions::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseCompletions::ExerciseId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseCompletions::ExerciseType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseCompletions::DurationSeconds)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExerciseCompletions::Notes).text().null())
                    .col(
                        ColumnDef::new(ExerciseCompletions::XpEarned)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseCompletions::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exercise_completion-user_id")
                            .from(ExerciseCompletions::Table, ExerciseCompletions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exercise_completion-exercise_id")
                            .from(ExerciseCompletions::Table, ExerciseCompletions::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExerciseCompletions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Exercises {
    Table,
    Id,
    Title,
    Description,
    ExerciseType,
    DurationMinutes,
    XpReward,
    Icon,
}

#[derive(DeriveIden)]
enum ExerciseCompletions {
    Table,
    Id,
    UserId,
    ExerciseId,
    ExerciseType,
    DurationSeconds,
    Notes,
    XpEarned,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
