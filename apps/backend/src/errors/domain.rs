//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Participant,
    WordAssignment,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Session row version moved between read and write
    OptimisticLock,
    /// Storage-level serialization failure or busy database
    WriteConflict,
    Other(String),
}

/// Rule violations a caller can act on. None of these change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    InvalidConfiguration,
    InvalidPlayerCount,
    PhaseMismatch,
    NotYourTurn,
    AlreadyActed,
    InvalidVote,
    ParticipantEliminated,
    SessionFull,
    EmptyInput,
    Other,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Other, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::PhaseMismatch, detail.into())
    }

    pub fn session_not_found(session_id: i64) -> Self {
        Self::NotFound(
            NotFoundKind::Session,
            format!("Session {session_id} not found"),
        )
    }

    pub fn participant_not_found(participant_id: i64) -> Self {
        Self::NotFound(
            NotFoundKind::Participant,
            format!("Participant {participant_id} not found"),
        )
    }

    /// Returns the validation kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(*kind),
            _ => None,
        }
    }

    /// True for conflicts that a fresh read of the session can resolve.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::Conflict(ConflictKind::OptimisticLock | ConflictKind::WriteConflict, _)
        )
    }
}
