use actix_web::{web, App, HttpServer};
use undercover_backend::config::engine::EngineConfig;
use undercover_backend::config::server::ServerConfig;
use undercover_backend::infra::state::build_state;
use undercover_backend::middleware::request_trace::RequestTrace;
use undercover_backend::{routes, telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let server = match ServerConfig::from_env() {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };
    let engine_config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid engine configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state().with_config(engine_config).build().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %server.host, port = server.port, "Starting undercover backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(server.bind_addr())?
    .run()
    .await
}
