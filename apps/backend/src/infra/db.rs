use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::DbSettings;
use crate::error::AppError;

/// Open a pool for `settings`. Does NOT run migrations.
///
/// SQLite gets a single connection: an in-memory database exists per
/// connection, and a file database allows one writer anyway.
pub async fn connect_db(settings: &DbSettings) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(settings.url().to_owned());
    options
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if settings.kind.is_sqlite() {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(16).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    info!(
        engine = settings.kind.engine(),
        url = %settings.redacted_url(),
        "Database connected"
    );
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(settings: &DbSettings) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(settings).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
