use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    Phase,
    Round,
    MaxRounds,
    TurnOrder,
    TurnIndex,
    UndercoverCount,
    MrWhiteCount,
    GuesserId,
    Outcome,
    RngSeed,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    SessionId,
    DisplayName,
    Alive,
    Role,
    HasClued,
    ClueText,
    HasVoted,
    VoteTarget,
    EliminatedRound,
    JoinedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WordAssignments {
    Table,
    SessionId,
    CivilianWord,
    UndercoverWord,
    MrWhiteMarker,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // sessions
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Sessions::Phase).string_len(24).not_null())
                    .col(
                        ColumnDef::new(Sessions::Round)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sessions::MaxRounds)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::TurnOrder)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Sessions::TurnIndex).small_integer().null())
                    .col(
                        ColumnDef::new(Sessions::UndercoverCount)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Sessions::MrWhiteCount)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Sessions::GuesserId).big_integer().null())
                    .col(ColumnDef::new(Sessions::Outcome).string_len(32).null())
                    .col(ColumnDef::new(Sessions::RngSeed).binary().null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        // participants
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Participants::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::DisplayName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::Alive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Participants::Role)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::HasClued)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Participants::ClueText).string().null())
                    .col(
                        ColumnDef::new(Participants::HasVoted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Participants::VoteTarget)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Participants::EliminatedRound)
                            .small_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Participants::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_session_id")
                            .from(Participants::Table, Participants::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_participants_session_alive")
                    .table(Participants::Table)
                    .col(Participants::SessionId)
                    .col(Participants::Alive)
                    .to_owned(),
            )
            .await?;

        // word_assignments
        manager
            .create_table(
                Table::create()
                    .table(WordAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WordAssignments::SessionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WordAssignments::CivilianWord)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WordAssignments::UndercoverWord)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WordAssignments::MrWhiteMarker)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WordAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_word_assignments_session_id")
                            .from(WordAssignments::Table, WordAssignments::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_table(Table::drop().table(WordAssignments::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_participants_session_alive")
                    .table(Participants::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        Ok(())
    }
}
