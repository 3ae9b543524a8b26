//! SeaORM adapter for the participants table - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::participants;

pub mod dto;

pub use dto::ParticipantUpdate;

/// All participants of a session in join order.
pub async fn list_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<participants::Model>, sea_orm::DbErr> {
    participants::Entity::find()
        .filter(participants::Column::SessionId.eq(session_id))
        .order_by_asc(participants::Column::JoinedAt)
        .order_by_asc(participants::Column::Id)
        .all(conn)
        .await
}

/// Alive participants of a session in join order.
pub async fn list_alive_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<participants::Model>, sea_orm::DbErr> {
    participants::Entity::find()
        .filter(participants::Column::SessionId.eq(session_id))
        .filter(participants::Column::Alive.eq(true))
        .order_by_asc(participants::Column::JoinedAt)
        .order_by_asc(participants::Column::Id)
        .all(conn)
        .await
}

pub async fn create_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    display_name: &str,
) -> Result<participants::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let row = participants::ActiveModel {
        id: NotSet,
        session_id: Set(session_id),
        display_name: Set(display_name.to_string()),
        alive: Set(true),
        role: Set(participants::ParticipantRole::Civilian),
        has_clued: Set(false),
        clue_text: Set(None),
        has_voted: Set(false),
        vote_target: Set(None),
        eliminated_round: Set(None),
        joined_at: Set(now),
        updated_at: Set(now),
    };
    row.insert(conn).await
}

/// Delete one participant; returns whether a row was removed.
pub async fn delete_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    participant_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let result = participants::Entity::delete_many()
        .filter(participants::Column::Id.eq(participant_id))
        .filter(participants::Column::SessionId.eq(session_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn update_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ParticipantUpdate,
) -> Result<participants::Model, sea_orm::DbErr> {
    let row = participants::ActiveModel {
        id: Set(dto.id),
        alive: Set(dto.alive),
        role: Set(dto.role),
        has_clued: Set(dto.has_clued),
        clue_text: Set(dto.clue_text),
        has_voted: Set(dto.has_voted),
        vote_target: Set(dto.vote_target),
        eliminated_round: Set(dto.eliminated_round),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    row.update(conn).await
}
