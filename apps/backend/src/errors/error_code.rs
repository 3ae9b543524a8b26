//! Error codes for the Undercover backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Undercover backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Role counts or round cap cannot produce a valid game
    InvalidConfiguration,
    /// Participant count outside the playable range
    InvalidPlayerCount,
    /// Action not allowed in the current phase
    PhaseMismatch,
    /// Caller is not the current clue giver
    NotYourTurn,
    /// Caller already acted this round
    AlreadyActed,
    /// Vote target or voter rejected
    InvalidVote,
    /// Caller has been eliminated
    ParticipantEliminated,
    /// Session already holds the maximum number of participants
    SessionFull,
    /// Required text input is blank
    EmptyInput,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Session not found
    SessionNotFound,
    /// Participant not found
    ParticipantNotFound,
    /// Word assignment missing for an active game
    WordsNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Optimistic lock conflict
    OptimisticLock,
    /// Storage reported a serialization failure
    WriteConflict,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Conflict retries exhausted; caller may try again
    RetryExhausted,
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Request Validation
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::AlreadyActed => "ALREADY_ACTED",
            Self::InvalidVote => "INVALID_VOTE",
            Self::ParticipantEliminated => "PARTICIPANT_ELIMINATED",
            Self::SessionFull => "SESSION_FULL",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            // Resource Not Found
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",
            Self::WordsNotFound => "WORDS_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::WriteConflict => "WRITE_CONFLICT",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::RetryExhausted => "RETRY_EXHAUSTED",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
