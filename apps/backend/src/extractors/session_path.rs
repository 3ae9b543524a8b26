use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::state::{ParticipantId, SessionId};
use crate::error::AppError;
use crate::errors::ErrorCode;

fn positive_id(req: &HttpRequest, name: &str) -> Result<i64, AppError> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| AppError::bad_request(ErrorCode::BadRequest, format!("Missing {name}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("{name} must be a positive integer, got '{raw}'"),
        )),
    }
}

/// `{session_id}` path segment, validated as a positive id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPath(pub SessionId);

impl FromRequest for SessionPath {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(positive_id(req, "session_id").map(SessionPath))
    }
}

/// `{session_id}/.../{participant_id}` path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantPath {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
}

impl FromRequest for ParticipantPath {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            positive_id(req, "session_id").and_then(|session_id| {
                Ok(ParticipantPath {
                    session_id,
                    participant_id: positive_id(req, "participant_id")?,
                })
            }),
        )
    }
}
