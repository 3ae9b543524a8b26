//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert it here, and higher
//! layers map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

/// Prefix for the structured optimistic-lock payload raised by adapters.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";
/// Prefix for the structured session-missing payload raised by adapters.
pub const SESSION_NOT_FOUND_PREFIX: &str = "SESSION_NOT_FOUND:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Serialization failures (40001), deadlocks (40P01) and a busy SQLite file
/// all mean the same thing to the engine: rerun the action.
fn is_write_conflict(msg: &str) -> bool {
    mentions_sqlstate(msg, "40001")
        || mentions_sqlstate(msg, "40P01")
        || msg.contains("could not serialize access")
        || msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("SQLITE_BUSY")
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(SESSION_NOT_FOUND_PREFIX) => {
            if let Some(id_str) = msg.strip_prefix(SESSION_NOT_FOUND_PREFIX) {
                if let Ok(session_id) = id_str.parse::<i64>() {
                    warn!(trace_id = %trace_id, session_id, "Session not found");
                    return DomainError::session_not_found(session_id);
                }
            }
            warn!(trace_id = %trace_id, raw_error = %msg, "Failed to parse SESSION_NOT_FOUND error");
            return DomainError::not_found(NotFoundKind::Session, "Session not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_PREFIX) => {
            if let Some(json_str) = msg.strip_prefix(OPTIMISTIC_LOCK_PREFIX) {
                #[derive(serde::Deserialize)]
                struct LockInfo {
                    expected: i32,
                    actual: i32,
                }

                if let Ok(info) = serde_json::from_str::<LockInfo>(json_str) {
                    warn!(
                        trace_id = %trace_id,
                        expected = info.expected,
                        actual = info.actual,
                        "Optimistic lock conflict detected"
                    );

                    return DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!(
                            "Session was modified concurrently (expected version {}, actual version {})",
                            info.expected, info.actual
                        ),
                    );
                }
            }

            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Session was modified by another transaction",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if is_write_conflict(&error_msg) {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Write conflict reported by storage");
        return DomainError::conflict(
            ConflictKind::WriteConflict,
            "Concurrent write on the same session",
        );
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
