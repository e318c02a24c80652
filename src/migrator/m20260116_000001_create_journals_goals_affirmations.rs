use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create JournalEntries Table
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(JournalEntries::Title).string().not_null())
                    .col(ColumnDef::new(JournalEntries::Content).text().not_null())
                    .col(ColumnDef::new(JournalEntries::Mood).string().null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_entry-user_id")
                            .from(JournalEntries::Table, JournalEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create Goals Table
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Goals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Goals::UserId).integer().not_null())
                    .col(ColumnDef::new(Goals::Title).string().not_null())
                    .col(ColumnDef::new(Goals::Description).text().null())
                    .col(ColumnDef::new(Goals::TargetDate).date().null())
                    .col(
                        ColumnDef::new(Goals::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Goals::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Goals::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goal-user_id")
                            .from(Goals::Table, Goals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create Affirmations Table
        manager
            .create_table(
                Table::create()
                    .table(Affirmations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Affirmations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Affirmations::UserId).integer().not_null())
                    .col(ColumnDef::new(Affirmations::Content).text().not_null())
                    .col(ColumnDef::new(Affirmations::Category).string().not_null())
                    .col(
                        ColumnDef::new(Affirmations::Favorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Affirmations::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-affirmation-user_id")
                            .from(Affirmations::Table, Affirmations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Affirmations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    UserId,
    Title,
    Content,
    Mood,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Goals {
    Table,
    Id,
    UserId,
    Title,
    Description,
    TargetDate,
    Completed,
    Progress,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Affirmations {
    Table,
    Id,
    UserId,
    Content,
    Category,
    Favorite,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
