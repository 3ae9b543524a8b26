use sea_orm::DatabaseTransaction;
use tracing::debug;

use super::GameFlowService;
use crate::domain::game_transition::{
    derive_session_transitions, SessionLifecycleView, SessionTransition,
};
use crate::domain::state::{SessionId, SessionSnapshot};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::repos::sessions;

/// Result of one persisted action.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMutation<T> {
    pub output: T,
    pub session_id: SessionId,
    pub old_version: i32,
    /// Version after the write; the one the next action must see.
    pub version: i32,
    pub transitions: Vec<SessionTransition>,
}

impl<T> SessionMutation<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SessionMutation<U> {
        SessionMutation {
            output: f(self.output),
            session_id: self.session_id,
            old_version: self.old_version,
            version: self.version,
            transitions: self.transitions,
        }
    }
}

impl GameFlowService {
    /// Load, transform with `mutation`, persist. A rejected mutation writes
    /// nothing.
    pub(super) async fn run_mutation<T, F>(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        mutation: F,
    ) -> Result<SessionMutation<T>, AppError>
    where
        F: FnOnce(&mut SessionSnapshot) -> Result<T, DomainError>,
    {
        let before = sessions::load_snapshot(txn, session_id).await?;
        let mut after = before.clone();
        let output = mutation(&mut after)?;
        self.commit(txn, &before, &after, output).await
    }

    /// Persist `after` against `before` and derive what changed.
    pub(super) async fn commit<T>(
        &self,
        txn: &DatabaseTransaction,
        before: &SessionSnapshot,
        after: &SessionSnapshot,
        output: T,
    ) -> Result<SessionMutation<T>, AppError> {
        let version = sessions::persist_snapshot(txn, before, after).await?;
        let transitions = derive_session_transitions(
            &SessionLifecycleView::from_snapshot(before),
            &SessionLifecycleView::from_snapshot(after),
        );
        debug!(
            session_id = after.session.id,
            old_version = before.session.version,
            version,
            transitions = transitions.len(),
            "Session mutation persisted"
        );
        Ok(SessionMutation {
            output,
            session_id: after.session.id,
            old_version: before.session.version,
            version,
            transitions,
        })
    }
}
