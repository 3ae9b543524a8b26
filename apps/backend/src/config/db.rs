use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Storage backend selected by `DB_KIND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite" | "sqlite-file" | "sqlite_file" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "DB_KIND must be postgres, sqlite-file or sqlite-memory, got '{other}'"
            ))),
        }
    }
}

impl DbKind {
    pub fn is_sqlite(self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }

    pub fn engine(self) -> &'static str {
        match self {
            DbKind::Postgres => "postgresql",
            DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
        }
    }
}

/// Where to connect. `url` carries credentials for Postgres, so `Debug`
/// and `Display` never print it.
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub kind: DbKind,
    url: String,
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("kind", &self.kind)
            .field("url", &self.redacted_url())
            .finish()
    }
}

impl DbSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("DB_KIND") {
            Some(raw) => raw.parse()?,
            None => DbKind::Postgres,
        };

        let url = match kind {
            DbKind::Postgres => {
                let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
                port.parse::<u16>().map_err(|_| {
                    AppError::config(format!("POSTGRES_PORT must be a port number, got '{port}'"))
                })?;
                let db_name = must_var(&lookup, "POSTGRES_DB")?;
                let username = must_var(&lookup, "APP_DB_USER")?;
                let password = must_var(&lookup, "APP_DB_PASSWORD")?;
                format!("postgresql://{username}:{password}@{host}:{port}/{db_name}")
            }
            DbKind::SqliteFile => {
                let path = must_var(&lookup, "SQLITE_PATH")?;
                format!("sqlite://{path}?mode=rwc")
            }
            DbKind::SqliteMemory => "sqlite::memory:".to_string(),
        };

        Ok(Self { kind, url })
    }

    /// Private in-memory SQLite database; used by tests.
    pub fn sqlite_memory() -> Self {
        Self {
            kind: DbKind::SqliteMemory,
            url: "sqlite::memory:".to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL with the password (if any) masked, for logs.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let userinfo = &self.url[scheme_end + 3..at];
                let user = userinfo.split(':').next().unwrap_or_default();
                format!("{}{user}:***{}", &self.url[..scheme_end + 3], &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}

fn must_var<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}
