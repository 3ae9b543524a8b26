//! SeaORM adapter for the sessions table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::entities::sessions;
use crate::infra::db_errors::{OPTIMISTIC_LOCK_PREFIX, SESSION_NOT_FOUND_PREFIX};

pub mod dto;

pub use dto::{SessionCreate, SessionUpdate};

// Adapter functions return DbErr; repos map to DomainError via map_db_err.

fn session_not_found(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("{SESSION_NOT_FOUND_PREFIX}{id}"))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find_by_id(session_id).one(conn).await
}

/// Find a session or fail with the structured SESSION_NOT_FOUND payload.
pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<sessions::Model, sea_orm::DbErr> {
    find_by_id(conn, session_id)
        .await?
        .ok_or_else(|| session_not_found(session_id))
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let session = sessions::ActiveModel {
        id: NotSet,
        phase: Set(sessions::SessionPhase::Waiting),
        round: Set(0),
        max_rounds: Set(dto.max_rounds),
        turn_order: Set("[]".to_string()),
        turn_index: Set(None),
        undercover_count: Set(dto.undercover_count),
        mr_white_count: Set(dto.mr_white_count),
        guesser_id: Set(None),
        outcome: Set(None),
        rng_seed: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        version: Set(1),
    };

    session.insert(conn).await
}

/// Write every mutable column if the stored version still matches, then
/// refetch.
///
/// Zero affected rows means either the session vanished or someone else
/// committed first; the two are told apart by a follow-up read.
pub async fn update_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionUpdate,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = sessions::Entity::update_many()
        .col_expr(sessions::Column::Phase, Expr::value(dto.phase))
        .col_expr(sessions::Column::Round, Expr::value(dto.round))
        .col_expr(sessions::Column::MaxRounds, Expr::value(dto.max_rounds))
        .col_expr(sessions::Column::TurnOrder, Expr::value(dto.turn_order))
        .col_expr(sessions::Column::TurnIndex, Expr::value(dto.turn_index))
        .col_expr(
            sessions::Column::UndercoverCount,
            Expr::value(dto.undercover_count),
        )
        .col_expr(sessions::Column::MrWhiteCount, Expr::value(dto.mr_white_count))
        .col_expr(sessions::Column::GuesserId, Expr::value(dto.guesser_id))
        .col_expr(sessions::Column::Outcome, Expr::value(dto.outcome))
        .col_expr(sessions::Column::RngSeed, Expr::value(dto.rng_seed))
        .col_expr(sessions::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            sessions::Column::Version,
            Expr::col(sessions::Column::Version).add(1),
        )
        .filter(sessions::Column::Id.eq(dto.id))
        .filter(sessions::Column::Version.eq(dto.expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, dto.id).await? {
            Some(current) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
                dto.expected_version, current.version
            ))),
            None => Err(session_not_found(dto.id)),
        };
    }

    require_session(conn, dto.id).await
}
