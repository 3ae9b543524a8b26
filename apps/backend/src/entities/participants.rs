use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum ParticipantRole {
    #[sea_orm(string_value = "CIVILIAN")]
    Civilian,
    #[sea_orm(string_value = "UNDERCOVER")]
    Undercover,
    #[sea_orm(string_value = "MR_WHITE")]
    MrWhite,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "session_id")]
    pub session_id: i64,
    #[sea_orm(column_name = "display_name")]
    pub display_name: String,
    pub alive: bool,
    pub role: ParticipantRole,
    #[sea_orm(column_name = "has_clued")]
    pub has_clued: bool,
    #[sea_orm(column_name = "clue_text")]
    pub clue_text: Option<String>,
    #[sea_orm(column_name = "has_voted")]
    pub has_voted: bool,
    #[sea_orm(column_name = "vote_target")]
    pub vote_target: Option<i64>,
    #[sea_orm(column_name = "eliminated_round", column_type = "SmallInteger")]
    pub eliminated_round: Option<i16>,
    #[sea_orm(column_name = "joined_at")]
    pub joined_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
