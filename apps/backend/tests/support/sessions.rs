//! Session setup helpers on top of the engine.

use undercover_backend::domain::roles::{Role, RoleConfig};
use undercover_backend::domain::state::{ParticipantId, Phase, SessionId, SessionSnapshot};
use undercover_backend::services::engine::GameEngine;
use undercover_backend::AppError;

/// Waiting session with `n` participants named p1..pn.
pub async fn lobby(
    engine: &GameEngine,
    n: usize,
) -> Result<(SessionId, Vec<ParticipantId>), AppError> {
    let session_id = engine.create_session().await?.session.id;
    let mut ids = Vec::with_capacity(n);
    for i in 1..=n {
        let joined = engine.join_session(session_id, &format!("p{i}")).await?;
        ids.push(joined.output.id);
    }
    Ok((session_id, ids))
}

/// Started session with `n` participants and the given role counts.
pub async fn started(
    engine: &GameEngine,
    n: usize,
    roles: RoleConfig,
    max_rounds: u16,
) -> Result<(SessionId, Vec<ParticipantId>), AppError> {
    let (session_id, ids) = lobby(engine, n).await?;
    engine
        .configure_session(session_id, roles, max_rounds)
        .await?;
    engine.start_game(session_id).await?;
    Ok((session_id, ids))
}

pub fn roles(undercover_count: u8, mr_white_count: u8) -> RoleConfig {
    RoleConfig {
        undercover_count,
        mr_white_count,
    }
}

/// Submit clues in turn order until the session leaves Discussion.
pub async fn clue_round(engine: &GameEngine, session_id: SessionId) -> Result<SessionSnapshot, AppError> {
    loop {
        let snap = engine.load_snapshot(session_id).await?;
        let Some(holder) = snap.awaiting_turn_holder() else {
            return Ok(snap);
        };
        engine
            .submit_clue(session_id, holder, &format!("clue-{holder}"))
            .await?;
    }
}

pub fn ids_with_role(snap: &SessionSnapshot, role: Role) -> Vec<ParticipantId> {
    snap.participants
        .iter()
        .filter(|p| p.role == role)
        .map(|p| p.id)
        .collect()
}

pub fn assert_phase(snap: &SessionSnapshot, expected: &str) {
    let actual = match snap.session.phase {
        Phase::Waiting => "waiting",
        Phase::Discussion { .. } => "discussion",
        Phase::Voting => "voting",
        Phase::MrWhiteGuessing { .. } => "mr_white_guessing",
        Phase::Results { .. } => "results",
    };
    assert_eq!(actual, expected, "unexpected phase {:?}", snap.session.phase);
}

/// Everyone alive votes for `target`; `target` votes for `fallback`.
pub async fn everyone_votes_for(
    engine: &GameEngine,
    session_id: SessionId,
    target: ParticipantId,
    fallback: ParticipantId,
) -> Result<(), AppError> {
    let snap = engine.load_snapshot(session_id).await?;
    let voters: Vec<ParticipantId> = snap.alive().map(|p| p.id).collect();
    for voter in voters {
        let choice = if voter == target { fallback } else { target };
        engine.cast_vote(session_id, voter, choice).await?;
    }
    Ok(())
}
