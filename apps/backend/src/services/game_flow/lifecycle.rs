use sea_orm::DatabaseTransaction;
use tracing::info;

use super::{GameFlowService, SessionMutation};
use crate::domain::machine;
use crate::domain::roles::RoleConfig;
use crate::domain::state::{Participant, ParticipantId, SessionId, SessionSnapshot};
use crate::error::AppError;
use crate::repos::sessions;

impl GameFlowService {
    pub async fn create_session(
        &self,
        txn: &DatabaseTransaction,
        max_rounds: u16,
    ) -> Result<SessionSnapshot, AppError> {
        let snap = sessions::create_session(txn, max_rounds).await?;
        info!(session_id = snap.session.id, max_rounds, "Session created");
        Ok(snap)
    }

    pub async fn load(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, AppError> {
        Ok(sessions::load_snapshot(txn, session_id).await?)
    }

    pub async fn join_session(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        display_name: &str,
    ) -> Result<SessionMutation<Participant>, AppError> {
        let before = sessions::load_snapshot(txn, session_id).await?;
        let name = machine::ensure_can_join(&before, display_name)?;
        let participant = sessions::add_participant(txn, session_id, &name).await?;

        let mut after = before.clone();
        after.participants.push(participant.clone());
        info!(session_id, participant_id = participant.id, "Participant joined");
        self.commit(txn, &before, &after, participant).await
    }

    pub async fn leave_session(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) -> Result<SessionMutation<()>, AppError> {
        let before = sessions::load_snapshot(txn, session_id).await?;
        machine::ensure_can_leave(&before, participant_id)?;
        sessions::remove_participant(txn, session_id, participant_id).await?;

        let mut after = before.clone();
        after.participants.retain(|p| p.id != participant_id);
        info!(session_id, participant_id, "Participant left");
        self.commit(txn, &before, &after, ()).await
    }

    pub async fn configure_session(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        roles: RoleConfig,
        max_rounds: u16,
    ) -> Result<SessionMutation<()>, AppError> {
        self.run_mutation(txn, session_id, |snap| {
            machine::configure(snap, roles, max_rounds)
        })
        .await
    }

    /// `seed` is drawn by the caller once per request so that a retried
    /// attempt deals the same game.
    pub async fn start_game(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        seed: [u8; 32],
    ) -> Result<SessionMutation<()>, AppError> {
        let words = self.word_bank();
        let result = self
            .run_mutation(txn, session_id, |snap| {
                machine::start_game(snap, seed, words)
            })
            .await?;
        info!(session_id, version = result.version, "Game started");
        Ok(result)
    }

    pub async fn restart_game(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
    ) -> Result<SessionMutation<()>, AppError> {
        let result = self.run_mutation(txn, session_id, machine::restart).await?;
        info!(session_id, "Session restarted");
        Ok(result)
    }

    pub async fn stop_game(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
    ) -> Result<SessionMutation<()>, AppError> {
        let result = self.run_mutation(txn, session_id, machine::stop).await?;
        info!(session_id, "Game stopped");
        Ok(result)
    }
}
