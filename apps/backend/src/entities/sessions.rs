use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum SessionPhase {
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    #[sea_orm(string_value = "DISCUSSION")]
    Discussion,
    #[sea_orm(string_value = "VOTING")]
    Voting,
    #[sea_orm(string_value = "MR_WHITE_GUESSING")]
    MrWhiteGuessing,
    #[sea_orm(string_value = "RESULTS")]
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum SessionOutcome {
    #[sea_orm(string_value = "CIVILIANS_WIN")]
    CiviliansWin,
    #[sea_orm(string_value = "UNDERCOVERS_WIN")]
    UndercoversWin,
    #[sea_orm(string_value = "MR_WHITE_WIN")]
    MrWhiteWin,
    #[sea_orm(string_value = "UNDERCOVERS_AND_MR_WHITE_WIN")]
    UndercoversAndMrWhiteWin,
    #[sea_orm(string_value = "MAX_ROUNDS_REACHED")]
    MaxRoundsReached,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub phase: SessionPhase,
    #[sea_orm(column_type = "SmallInteger")]
    pub round: i16,
    #[sea_orm(column_name = "max_rounds", column_type = "SmallInteger")]
    pub max_rounds: i16,
    /// JSON array of participant ids
    #[sea_orm(column_name = "turn_order", column_type = "Text")]
    pub turn_order: String,
    #[sea_orm(column_name = "turn_index", column_type = "SmallInteger")]
    pub turn_index: Option<i16>,
    #[sea_orm(column_name = "undercover_count", column_type = "SmallInteger")]
    pub undercover_count: i16,
    #[sea_orm(column_name = "mr_white_count", column_type = "SmallInteger")]
    pub mr_white_count: i16,
    #[sea_orm(column_name = "guesser_id")]
    pub guesser_id: Option<i64>,
    pub outcome: Option<SessionOutcome>,
    #[sea_orm(column_name = "rng_seed", column_type = "VarBinary(StringLen::None)")]
    pub rng_seed: Option<Vec<u8>>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "version")]
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(has_one = "super::word_assignments::Entity")]
    WordAssignment,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::word_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WordAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
