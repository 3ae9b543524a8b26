use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod health;
pub mod sessions;

/// Malformed JSON bodies become problem+json 400s like every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            AppError::bad_request(ErrorCode::BadRequest, format!("Invalid JSON body: {err}"))
                .into()
        })
}

/// Register every route. Used by `main.rs` and by the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Sessions: /api/sessions/**
    cfg.service(web::scope("/api/sessions").configure(sessions::configure_routes));
}
