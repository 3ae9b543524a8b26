use crate::config::db::DbSettings;
use crate::config::engine::EngineConfig;
use crate::domain::words::WordBank;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::engine::GameEngine;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
#[derive(Debug, Default)]
pub struct StateBuilder {
    db: Option<DbSettings>,
    config: EngineConfig,
    words: Option<WordBank>,
    seed: Option<[u8; 32]>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these settings instead of reading `DB_KIND` and friends.
    pub fn with_db(mut self, settings: DbSettings) -> Self {
        self.db = Some(settings);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_word_bank(mut self, words: WordBank) -> Self {
        self.words = Some(words);
        self
    }

    pub fn with_seed(mut self, seed: [u8; 32]) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Connect, migrate and wire the engine.
    pub async fn build(self) -> Result<AppState, AppError> {
        let settings = match self.db {
            Some(settings) => settings,
            None => DbSettings::from_env()?,
        };
        let conn = bootstrap_db(&settings).await?;

        let mut engine = GameEngine::new(conn.clone(), self.config);
        if let Some(words) = self.words {
            engine = engine.with_word_bank(words);
        }
        if let Some(seed) = self.seed {
            engine = engine.with_seed(seed);
        }
        Ok(AppState::new(conn, engine))
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
