use sea_orm::DatabaseConnection;

use crate::services::engine::GameEngine;

/// Application state shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub engine: GameEngine,
}

impl AppState {
    pub fn new(db: DatabaseConnection, engine: GameEngine) -> Self {
        Self { db, engine }
    }
}
