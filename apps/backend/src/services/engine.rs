//! Public entry point for every session operation.
//!
//! Each call is one atomic unit: `with_retry(with_txn(load -> transition ->
//! persist))`. Conflicting writes on the same session are re-run from the
//! read step; once the retry budget is spent the caller gets a transient
//! error. Committed transitions are published to the session hub.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction};
use tracing::{info, instrument};

use crate::config::engine::EngineConfig;
use crate::db::retry::with_retry;
use crate::db::txn::{with_txn, TxnFuture};
use crate::domain::machine::{ClueOutcome, GuessOutcome, RepairOutcome, VoteOutcome};
use crate::domain::player_view::{build_player_view, PlayerView};
use crate::domain::roles::RoleConfig;
use crate::domain::seed_derivation::fresh_seed;
use crate::domain::state::{Participant, ParticipantId, SessionId, SessionSnapshot};
use crate::domain::words::WordBank;
use crate::error::AppError;
use crate::realtime::{SessionEvent, SessionHub};
use crate::services::game_flow::{GameFlowService, SessionMutation};

/// A player view and the session version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedView {
    pub version: i32,
    pub view: PlayerView,
}

/// Shared handle; clones share the pool, hub and word bank.
#[derive(Clone)]
pub struct GameEngine {
    db: DatabaseConnection,
    flow: GameFlowService,
    config: EngineConfig,
    hub: Arc<SessionHub>,
    fixed_seed: Option<[u8; 32]>,
}

impl GameEngine {
    pub fn new(db: DatabaseConnection, config: EngineConfig) -> Self {
        Self {
            db,
            flow: GameFlowService::default(),
            config,
            hub: Arc::new(SessionHub::new()),
            fixed_seed: None,
        }
    }

    pub fn with_word_bank(mut self, words: WordBank) -> Self {
        self.flow = GameFlowService::new(Arc::new(words));
        self
    }

    /// Every game started by this engine uses `seed`. For reproducible tests.
    pub fn with_seed(mut self, seed: [u8; 32]) -> Self {
        self.fixed_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hub(&self) -> Arc<SessionHub> {
        self.hub.clone()
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn run_in_txn<T, F>(&self, operation: &'static str, body: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: Fn(GameFlowService, &DatabaseTransaction) -> TxnFuture<'_, T> + Clone + Send + 'static,
    {
        with_retry(&self.config.retry, operation, || {
            let db = self.db.clone();
            let flow = self.flow.clone();
            let body = body.clone();
            async move { with_txn(&db, move |txn| body(flow, txn)).await }
        })
        .await
    }

    async fn execute<T, F>(
        &self,
        operation: &'static str,
        body: F,
    ) -> Result<SessionMutation<T>, AppError>
    where
        T: Send + 'static,
        F: Fn(GameFlowService, &DatabaseTransaction) -> TxnFuture<'_, SessionMutation<T>>
            + Clone
            + Send
            + 'static,
    {
        let result = self.run_in_txn(operation, body).await?;
        self.publish(operation, &result);
        Ok(result)
    }

    fn publish<T>(&self, operation: &'static str, result: &SessionMutation<T>) {
        if result.transitions.is_empty() {
            return;
        }
        info!(
            operation,
            session_id = result.session_id,
            version = result.version,
            transitions = ?result.transitions,
            "Session transitions committed"
        );
        self.hub.publish(SessionEvent {
            session_id: result.session_id,
            version: result.version,
            transitions: result.transitions.clone(),
        });
    }

    #[instrument(skip(self))]
    pub async fn create_session(&self) -> Result<SessionSnapshot, AppError> {
        let max_rounds = self.config.default_max_rounds;
        self.run_in_txn("create_session", move |flow, txn| {
            Box::pin(async move { flow.create_session(txn, max_rounds).await })
        })
        .await
    }

    /// Current state of a session as one participant may see it.
    #[instrument(skip(self))]
    pub async fn player_view(
        &self,
        session_id: SessionId,
        viewer: ParticipantId,
    ) -> Result<VersionedView, AppError> {
        let snap = self.load_snapshot(session_id).await?;
        Ok(VersionedView {
            version: snap.session.version,
            view: build_player_view(&snap, viewer)?,
        })
    }

    pub async fn load_snapshot(&self, session_id: SessionId) -> Result<SessionSnapshot, AppError> {
        self.run_in_txn("load_snapshot", move |flow, txn| {
            Box::pin(async move { flow.load(txn, session_id).await })
        })
        .await
    }

    #[instrument(skip(self, display_name))]
    pub async fn join_session(
        &self,
        session_id: SessionId,
        display_name: &str,
    ) -> Result<SessionMutation<Participant>, AppError> {
        let name = display_name.to_owned();
        self.execute("join_session", move |flow, txn| {
            let name = name.clone();
            Box::pin(async move { flow.join_session(txn, session_id, &name).await })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn leave_session(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) -> Result<SessionMutation<()>, AppError> {
        self.execute("leave_session", move |flow, txn| {
            Box::pin(async move { flow.leave_session(txn, session_id, participant_id).await })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn configure_session(
        &self,
        session_id: SessionId,
        roles: RoleConfig,
        max_rounds: u16,
    ) -> Result<SessionMutation<()>, AppError> {
        self.execute("configure_session", move |flow, txn| {
            Box::pin(async move {
                flow.configure_session(txn, session_id, roles, max_rounds)
                    .await
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn start_game(&self, session_id: SessionId) -> Result<SessionMutation<()>, AppError> {
        let seed = self.fixed_seed.unwrap_or_else(fresh_seed);
        self.execute("start_game", move |flow, txn| {
            Box::pin(async move { flow.start_game(txn, session_id, seed).await })
        })
        .await
    }

    #[instrument(skip(self, clue))]
    pub async fn submit_clue(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        clue: &str,
    ) -> Result<SessionMutation<ClueOutcome>, AppError> {
        let clue = clue.to_owned();
        self.execute("submit_clue", move |flow, txn| {
            let clue = clue.clone();
            Box::pin(async move {
                flow.submit_clue(txn, session_id, participant_id, &clue)
                    .await
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn force_voting(
        &self,
        session_id: SessionId,
    ) -> Result<SessionMutation<()>, AppError> {
        self.execute("force_voting", move |flow, txn| {
            Box::pin(async move { flow.force_voting(txn, session_id).await })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn cast_vote(
        &self,
        session_id: SessionId,
        voter_id: ParticipantId,
        target_id: ParticipantId,
    ) -> Result<SessionMutation<VoteOutcome>, AppError> {
        self.execute("cast_vote", move |flow, txn| {
            Box::pin(async move { flow.cast_vote(txn, session_id, voter_id, target_id).await })
        })
        .await
    }

    #[instrument(skip(self, guess))]
    pub async fn submit_guess(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        guess: &str,
    ) -> Result<SessionMutation<GuessOutcome>, AppError> {
        let guess = guess.to_owned();
        self.execute("submit_guess", move |flow, txn| {
            let guess = guess.clone();
            Box::pin(async move {
                flow.submit_guess(txn, session_id, participant_id, &guess)
                    .await
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn restart_game(
        &self,
        session_id: SessionId,
    ) -> Result<SessionMutation<()>, AppError> {
        self.execute("restart_game", move |flow, txn| {
            Box::pin(async move { flow.restart_game(txn, session_id).await })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn stop_game(&self, session_id: SessionId) -> Result<SessionMutation<()>, AppError> {
        self.execute("stop_game", move |flow, txn| {
            Box::pin(async move { flow.stop_game(txn, session_id).await })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn repair_session(
        &self,
        session_id: SessionId,
    ) -> Result<SessionMutation<RepairOutcome>, AppError> {
        self.execute("repair_session", move |flow, txn| {
            Box::pin(async move { flow.repair_session(txn, session_id).await })
        })
        .await
    }
}
