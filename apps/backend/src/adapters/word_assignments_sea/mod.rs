//! SeaORM adapter for the word_assignments table.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::word_assignments;

pub async fn find_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<word_assignments::Model>, sea_orm::DbErr> {
    word_assignments::Entity::find_by_id(session_id)
        .one(conn)
        .await
}

pub async fn create_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    civilian_word: &str,
    undercover_word: &str,
    mr_white_marker: Option<&str>,
) -> Result<word_assignments::Model, sea_orm::DbErr> {
    let row = word_assignments::ActiveModel {
        session_id: Set(session_id),
        civilian_word: Set(civilian_word.to_string()),
        undercover_word: Set(undercover_word.to_string()),
        mr_white_marker: Set(mr_white_marker.map(str::to_string)),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    row.insert(conn).await
}

pub async fn delete_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = word_assignments::Entity::delete_many()
        .filter(word_assignments::Column::SessionId.eq(session_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
