//! Session repository: rows in, `SessionSnapshot` out, and back again.

use sea_orm::ConnectionTrait;

use crate::adapters::participants_sea::{self as participants_adapter, ParticipantUpdate};
use crate::adapters::sessions_sea::{self as sessions_adapter, SessionCreate, SessionUpdate};
use crate::adapters::word_assignments_sea as words_adapter;
use crate::domain::roles::{Role, RoleConfig};
use crate::domain::seed_derivation::seed_from_bytes;
use crate::domain::state::{
    Ballot, Participant, ParticipantId, Phase, Session, SessionId, SessionSnapshot,
    WordAssignment,
};
use crate::domain::win::GameOutcome;
use crate::entities::participants::{self, ParticipantRole};
use crate::entities::sessions::{self, SessionOutcome, SessionPhase};
use crate::entities::word_assignments;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;

fn corrupt(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

fn narrow_u16(value: i16, what: &str, session_id: SessionId) -> Result<u16, DomainError> {
    u16::try_from(value).map_err(|_| corrupt(format!("session {session_id}: negative {what}")))
}

fn widen_i16(value: u16, what: &str) -> Result<i16, DomainError> {
    i16::try_from(value).map_err(|_| corrupt(format!("{what} {value} does not fit the column")))
}

impl From<ParticipantRole> for Role {
    fn from(role: ParticipantRole) -> Self {
        match role {
            ParticipantRole::Civilian => Role::Civilian,
            ParticipantRole::Undercover => Role::Undercover,
            ParticipantRole::MrWhite => Role::MrWhite,
        }
    }
}

impl From<Role> for ParticipantRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Civilian => ParticipantRole::Civilian,
            Role::Undercover => ParticipantRole::Undercover,
            Role::MrWhite => ParticipantRole::MrWhite,
        }
    }
}

impl From<SessionOutcome> for GameOutcome {
    fn from(outcome: SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::CiviliansWin => GameOutcome::CiviliansWin,
            SessionOutcome::UndercoversWin => GameOutcome::UndercoversWin,
            SessionOutcome::MrWhiteWin => GameOutcome::MrWhiteWin,
            SessionOutcome::UndercoversAndMrWhiteWin => GameOutcome::UndercoversAndMrWhiteWin,
            SessionOutcome::MaxRoundsReached => GameOutcome::MaxRoundsReached,
        }
    }
}

impl From<GameOutcome> for SessionOutcome {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::CiviliansWin => SessionOutcome::CiviliansWin,
            GameOutcome::UndercoversWin => SessionOutcome::UndercoversWin,
            GameOutcome::MrWhiteWin => SessionOutcome::MrWhiteWin,
            GameOutcome::UndercoversAndMrWhiteWin => SessionOutcome::UndercoversAndMrWhiteWin,
            GameOutcome::MaxRoundsReached => SessionOutcome::MaxRoundsReached,
        }
    }
}

fn phase_from_row(row: &sessions::Model) -> Result<Phase, DomainError> {
    let phase = match row.phase {
        SessionPhase::Waiting => Phase::Waiting,
        SessionPhase::Discussion => {
            let index = row
                .turn_index
                .ok_or_else(|| corrupt(format!("session {} in discussion without a turn", row.id)))?;
            Phase::Discussion {
                turn_index: usize::try_from(index)
                    .map_err(|_| corrupt(format!("session {}: negative turn index", row.id)))?,
            }
        }
        SessionPhase::Voting => Phase::Voting,
        SessionPhase::MrWhiteGuessing => Phase::MrWhiteGuessing {
            guesser: row
                .guesser_id
                .ok_or_else(|| corrupt(format!("session {} guessing without a guesser", row.id)))?,
        },
        SessionPhase::Results => Phase::Results {
            outcome: row
                .outcome
                .map(GameOutcome::from)
                .ok_or_else(|| corrupt(format!("session {} in results without an outcome", row.id)))?,
        },
    };
    Ok(phase)
}

fn session_from_row(row: &sessions::Model) -> Result<Session, DomainError> {
    let turn_order: Vec<ParticipantId> = serde_json::from_str(&row.turn_order)
        .map_err(|e| corrupt(format!("session {}: unreadable turn order: {e}", row.id)))?;
    let rng_seed = match row.rng_seed.as_deref() {
        None => None,
        Some(bytes) => Some(
            seed_from_bytes(bytes)
                .ok_or_else(|| corrupt(format!("session {}: rng seed is not 32 bytes", row.id)))?,
        ),
    };
    let undercover_count = u8::try_from(row.undercover_count)
        .map_err(|_| corrupt(format!("session {}: bad undercover count", row.id)))?;
    let mr_white_count = u8::try_from(row.mr_white_count)
        .map_err(|_| corrupt(format!("session {}: bad mr white count", row.id)))?;

    Ok(Session {
        id: row.id,
        phase: phase_from_row(row)?,
        round: narrow_u16(row.round, "round", row.id)?,
        max_rounds: narrow_u16(row.max_rounds, "max rounds", row.id)?,
        roles: RoleConfig {
            undercover_count,
            mr_white_count,
        },
        turn_order,
        rng_seed,
        version: row.version,
    })
}

fn participant_from_row(row: participants::Model) -> Result<Participant, DomainError> {
    let ballot = match (row.has_voted, row.vote_target) {
        (false, _) => Ballot::Undecided,
        (true, None) => Ballot::Abstained,
        (true, Some(target)) => Ballot::For(target),
    };
    let eliminated_round = row
        .eliminated_round
        .map(|r| narrow_u16(r, "elimination round", row.session_id))
        .transpose()?;
    Ok(Participant {
        id: row.id,
        display_name: row.display_name,
        alive: row.alive,
        role: row.role.into(),
        clue: row
            .has_clued
            .then(|| row.clue_text.unwrap_or_default()),
        ballot,
        eliminated_round,
    })
}

fn words_from_row(row: word_assignments::Model) -> WordAssignment {
    WordAssignment {
        civilian_word: row.civilian_word,
        undercover_word: row.undercover_word,
        mr_white_marker: row.mr_white_marker,
    }
}

fn session_update(session: &Session, expected_version: i32) -> Result<SessionUpdate, DomainError> {
    let (phase, turn_index, guesser_id, outcome) = match session.phase {
        Phase::Waiting => (SessionPhase::Waiting, None, None, None),
        Phase::Discussion { turn_index } => (
            SessionPhase::Discussion,
            Some(
                i16::try_from(turn_index)
                    .map_err(|_| corrupt(format!("turn index {turn_index} out of range")))?,
            ),
            None,
            None,
        ),
        Phase::Voting => (SessionPhase::Voting, None, None, None),
        Phase::MrWhiteGuessing { guesser } => {
            (SessionPhase::MrWhiteGuessing, None, Some(guesser), None)
        }
        Phase::Results { outcome } => (
            SessionPhase::Results,
            None,
            None,
            Some(SessionOutcome::from(outcome)),
        ),
    };
    let turn_order = serde_json::to_string(&session.turn_order)
        .map_err(|e| corrupt(format!("turn order not serializable: {e}")))?;

    Ok(SessionUpdate {
        id: session.id,
        phase,
        round: widen_i16(session.round, "round")?,
        max_rounds: widen_i16(session.max_rounds, "max rounds")?,
        turn_order,
        turn_index,
        undercover_count: i16::from(session.roles.undercover_count),
        mr_white_count: i16::from(session.roles.mr_white_count),
        guesser_id,
        outcome,
        rng_seed: session.rng_seed.map(|seed| seed.to_vec()),
        expected_version,
    })
}

fn participant_update(p: &Participant) -> Result<ParticipantUpdate, DomainError> {
    Ok(ParticipantUpdate {
        id: p.id,
        alive: p.alive,
        role: p.role.into(),
        has_clued: p.has_clued(),
        clue_text: p.clue.clone(),
        has_voted: p.ballot.is_decided(),
        vote_target: p.ballot.target(),
        eliminated_round: p
            .eliminated_round
            .map(|r| widen_i16(r, "elimination round"))
            .transpose()?,
    })
}

/// Create a session in the Waiting phase with default role counts.
pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    max_rounds: u16,
) -> Result<SessionSnapshot, DomainError> {
    let defaults = RoleConfig::default();
    let dto = SessionCreate::new(widen_i16(max_rounds, "max rounds")?).with_roles(
        i16::from(defaults.undercover_count),
        i16::from(defaults.mr_white_count),
    );
    let row = sessions_adapter::create_session(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(SessionSnapshot {
        session: session_from_row(&row)?,
        participants: Vec::new(),
        words: None,
    })
}

/// Load the session row, its roster (join order) and its words.
pub async fn load_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: SessionId,
) -> Result<SessionSnapshot, DomainError> {
    let row = sessions_adapter::require_session(conn, session_id)
        .await
        .map_err(map_db_err)?;
    let session = session_from_row(&row)?;

    let participants = participants_adapter::list_by_session(conn, session_id)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(participant_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let words = words_adapter::find_by_session(conn, session_id)
        .await
        .map_err(map_db_err)?
        .map(words_from_row);

    Ok(SessionSnapshot {
        session,
        participants,
        words,
    })
}

/// Ids of the alive participants, in join order.
pub async fn alive_participant_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: SessionId,
) -> Result<Vec<ParticipantId>, DomainError> {
    let rows = participants_adapter::list_alive_by_session(conn, session_id)
        .await
        .map_err(map_db_err)?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}

pub async fn add_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: SessionId,
    display_name: &str,
) -> Result<Participant, DomainError> {
    let row = participants_adapter::create_participant(conn, session_id, display_name)
        .await
        .map_err(map_db_err)?;
    participant_from_row(row)
}

pub async fn remove_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: SessionId,
    participant_id: ParticipantId,
) -> Result<(), DomainError> {
    let removed = participants_adapter::delete_participant(conn, session_id, participant_id)
        .await
        .map_err(map_db_err)?;
    if !removed {
        return Err(DomainError::participant_not_found(participant_id));
    }
    Ok(())
}

/// Write the difference between `before` and `after` and bump the session
/// version. Returns the new version.
///
/// The session row is always written, even when unchanged, so that every
/// committed action moves the version and concurrent actions on the same
/// session serialise on it. Roster membership is not diffed here.
pub async fn persist_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    before: &SessionSnapshot,
    after: &SessionSnapshot,
) -> Result<i32, DomainError> {
    let session_id = after.session.id;

    for participant in &after.participants {
        match before.participant(participant.id) {
            Some(previous) if previous != participant => {}
            _ => continue,
        }
        participants_adapter::update_participant(conn, participant_update(participant)?)
            .await
            .map_err(map_db_err)?;
    }

    if before.words != after.words {
        if before.words.is_some() {
            words_adapter::delete_by_session(conn, session_id)
                .await
                .map_err(map_db_err)?;
        }
        if let Some(words) = &after.words {
            words_adapter::create_assignment(
                conn,
                session_id,
                &words.civilian_word,
                &words.undercover_word,
                words.mr_white_marker.as_deref(),
            )
            .await
            .map_err(map_db_err)?;
        }
    }

    let updated = sessions_adapter::update_session(
        conn,
        session_update(&after.session, before.session.version)?,
    )
    .await
    .map_err(map_db_err)?;

    Ok(updated.version)
}
