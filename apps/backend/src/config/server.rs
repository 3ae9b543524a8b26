use std::env;

use crate::error::AppError;

/// HTTP bind address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a port number, got '{raw}'"))
            })?,
            Err(_) => 3001,
        };
        Ok(Self { host, port })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
