use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use undercover_backend::config::db::{DbKind, DbSettings};
use undercover_backend::infra::db::connect_db;

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Undercover database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    // Target database comes from the same variables the backend reads.
    let settings = match DbSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    if settings.kind == DbKind::SqliteMemory {
        eprintln!("DB_KIND=sqlite-memory is not supported here: the database would vanish when the command exits.");
        std::process::exit(2);
    }

    let conn = match connect_db(&settings).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Connection failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&conn, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
    tracing::info!(engine = settings.kind.engine(), "Migration command completed");
}
