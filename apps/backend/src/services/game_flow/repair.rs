use sea_orm::DatabaseTransaction;
use tracing::{info, warn};

use super::{GameFlowService, SessionMutation};
use crate::domain::machine::{self, RepairOutcome};
use crate::domain::state::SessionId;
use crate::error::AppError;

impl GameFlowService {
    /// Idempotent consistency pass; see `machine::repair`.
    pub async fn repair_session(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
    ) -> Result<SessionMutation<RepairOutcome>, AppError> {
        let result = self
            .run_mutation(txn, session_id, machine::repair)
            .await?;
        match &result.output {
            RepairOutcome::NoChange => info!(session_id, "Repair found nothing to fix"),
            RepairOutcome::TurnAdvanced { participant_id } => {
                warn!(session_id, participant_id, "Repair advanced a stale turn pointer")
            }
            RepairOutcome::VotingStarted => {
                warn!(session_id, "Repair moved a finished discussion to voting")
            }
            RepairOutcome::RoundResolved(_) => {
                warn!(session_id, "Repair resolved a completed vote")
            }
        }
        Ok(result)
    }
}
