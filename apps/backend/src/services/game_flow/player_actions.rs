use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::{GameFlowService, SessionMutation};
use crate::domain::machine::{self, ClueOutcome, GuessOutcome, RoundNext, VoteOutcome};
use crate::domain::state::{ParticipantId, SessionId};
use crate::error::AppError;

fn log_round_next(session_id: SessionId, next: &RoundNext) {
    match next {
        RoundNext::NextRound { round } => info!(session_id, round, "Next round started"),
        RoundNext::MrWhiteGuessing { guesser } => {
            info!(session_id, guesser, "MrWhite voted out, awaiting guess")
        }
        RoundNext::GameOver { outcome } => info!(session_id, ?outcome, "Game over"),
    }
}

impl GameFlowService {
    pub async fn submit_clue(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        participant_id: ParticipantId,
        clue: &str,
    ) -> Result<SessionMutation<ClueOutcome>, AppError> {
        debug!(session_id, participant_id, "Submitting clue");
        let result = self
            .run_mutation(txn, session_id, |snap| {
                machine::submit_clue(snap, participant_id, clue)
            })
            .await?;
        if result.output == ClueOutcome::VotingStarted {
            info!(session_id, "All clues in, voting started");
        }
        Ok(result)
    }

    /// Host action. No host identity is checked.
    pub async fn force_voting(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
    ) -> Result<SessionMutation<()>, AppError> {
        let result = self
            .run_mutation(txn, session_id, machine::force_voting)
            .await?;
        info!(session_id, "Voting forced");
        Ok(result)
    }

    pub async fn cast_vote(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        voter_id: ParticipantId,
        target_id: ParticipantId,
    ) -> Result<SessionMutation<VoteOutcome>, AppError> {
        debug!(session_id, voter_id, target_id, "Casting vote");
        let result = self
            .run_mutation(txn, session_id, |snap| {
                machine::cast_vote(snap, voter_id, target_id)
            })
            .await?;
        if let VoteOutcome::Resolved(resolution) = &result.output {
            info!(
                session_id,
                tie = resolution.tally.tie,
                eliminated = ?resolution.tally.eliminated,
                "Round resolved"
            );
            log_round_next(session_id, &resolution.next);
        }
        Ok(result)
    }

    pub async fn submit_guess(
        &self,
        txn: &DatabaseTransaction,
        session_id: SessionId,
        participant_id: ParticipantId,
        guess: &str,
    ) -> Result<SessionMutation<GuessOutcome>, AppError> {
        let result = self
            .run_mutation(txn, session_id, |snap| {
                machine::submit_guess(snap, participant_id, guess)
            })
            .await?;
        info!(
            session_id,
            participant_id,
            correct = result.output.correct,
            "MrWhite guess judged"
        );
        log_round_next(session_id, &result.output.next);
        Ok(result)
    }
}
