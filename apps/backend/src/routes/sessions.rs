//! Session endpoints under `/api/sessions`.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::game_transition::SessionTransition;
use crate::domain::roles::RoleConfig;
use crate::domain::state::{ParticipantId, PhaseKind, SessionId};
use crate::error::AppError;
use crate::extractors::{ParticipantPath, SessionPath};
use crate::services::game_flow::SessionMutation;
use crate::state::app_state::AppState;

/// Body returned by every mutating endpoint.
#[derive(Debug, Serialize)]
struct ActionResponse<T> {
    session_id: SessionId,
    version: i32,
    result: T,
    transitions: Vec<SessionTransition>,
}

impl<T> From<SessionMutation<T>> for ActionResponse<T> {
    fn from(m: SessionMutation<T>) -> Self {
        Self {
            session_id: m.session_id,
            version: m.version,
            result: m.output,
            transitions: m.transitions,
        }
    }
}

fn action_ok<T: Serialize>(m: SessionMutation<T>) -> HttpResponse {
    HttpResponse::Ok().json(ActionResponse::from(m))
}

#[derive(Debug, Serialize)]
struct CreatedSession {
    session_id: SessionId,
    version: i32,
    phase: PhaseKind,
    max_rounds: u16,
    undercover_count: u8,
    mr_white_count: u8,
}

#[derive(Debug, Deserialize)]
struct JoinRequest {
    display_name: String,
}

#[derive(Debug, Serialize)]
struct Joined {
    participant_id: ParticipantId,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ConfigRequest {
    undercover_count: u8,
    mr_white_count: u8,
    max_rounds: u16,
}

#[derive(Debug, Deserialize)]
struct ClueRequest {
    participant_id: ParticipantId,
    clue: String,
}

#[derive(Debug, Deserialize)]
struct VoteRequest {
    voter_id: ParticipantId,
    target_id: ParticipantId,
}

#[derive(Debug, Deserialize)]
struct GuessRequest {
    participant_id: ParticipantId,
    guess: String,
}

fn view_etag(session_id: SessionId, viewer: ParticipantId, version: i32) -> String {
    format!("W/\"session-{session_id}-p{viewer}-v{version}\"")
}

fn etag_matches(req: &HttpRequest, etag: &str) -> bool {
    req.headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|client| {
            client.trim() == "*" || client.split(',').map(str::trim).any(|e| e == etag)
        })
}

/// POST /api/sessions
async fn create_session(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let snap = app_state.engine.create_session().await?;
    let session = &snap.session;
    Ok(HttpResponse::Created().json(CreatedSession {
        session_id: session.id,
        version: session.version,
        phase: session.phase.kind(),
        max_rounds: session.max_rounds,
        undercover_count: session.roles.undercover_count,
        mr_white_count: session.roles.mr_white_count,
    }))
}

/// GET /api/sessions/{session_id}/view/{participant_id}
///
/// Supports `If-None-Match`: an unchanged session answers `304`.
async fn get_view(
    req: HttpRequest,
    path: ParticipantPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let versioned = app_state
        .engine
        .player_view(path.session_id, path.participant_id)
        .await?;
    let etag = view_etag(path.session_id, path.participant_id, versioned.version);

    if etag_matches(&req, &etag) {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(versioned.view))
}

/// POST /api/sessions/{session_id}/participants
async fn join(
    path: SessionPath,
    body: web::Json<JoinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = app_state
        .engine
        .join_session(path.0, &body.display_name)
        .await?;
    let response = ActionResponse::from(result.map(|p| Joined {
        participant_id: p.id,
        display_name: p.display_name,
    }));
    Ok(HttpResponse::Created().json(response))
}

/// DELETE /api/sessions/{session_id}/participants/{participant_id}
async fn leave(
    path: ParticipantPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = app_state
        .engine
        .leave_session(path.session_id, path.participant_id)
        .await?;
    Ok(action_ok(result))
}

/// PUT /api/sessions/{session_id}/config
async fn configure(
    path: SessionPath,
    body: web::Json<ConfigRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let roles = RoleConfig {
        undercover_count: body.undercover_count,
        mr_white_count: body.mr_white_count,
    };
    let result = app_state
        .engine
        .configure_session(path.0, roles, body.max_rounds)
        .await?;
    Ok(action_ok(result))
}

/// POST /api/sessions/{session_id}/start
async fn start(path: SessionPath, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(action_ok(app_state.engine.start_game(path.0).await?))
}

/// POST /api/sessions/{session_id}/clues
async fn submit_clue(
    path: SessionPath,
    body: web::Json<ClueRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = app_state
        .engine
        .submit_clue(path.0, body.participant_id, &body.clue)
        .await?;
    Ok(action_ok(result))
}

/// POST /api/sessions/{session_id}/force-voting
async fn force_voting(
    path: SessionPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(action_ok(app_state.engine.force_voting(path.0).await?))
}

/// POST /api/sessions/{session_id}/votes
async fn cast_vote(
    path: SessionPath,
    body: web::Json<VoteRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = app_state
        .engine
        .cast_vote(path.0, body.voter_id, body.target_id)
        .await?;
    Ok(action_ok(result))
}

/// POST /api/sessions/{session_id}/guess
async fn submit_guess(
    path: SessionPath,
    body: web::Json<GuessRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = app_state
        .engine
        .submit_guess(path.0, body.participant_id, &body.guess)
        .await?;
    Ok(action_ok(result))
}

/// POST /api/sessions/{session_id}/restart
async fn restart(
    path: SessionPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(action_ok(app_state.engine.restart_game(path.0).await?))
}

/// POST /api/sessions/{session_id}/stop
async fn stop(path: SessionPath, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(action_ok(app_state.engine.stop_game(path.0).await?))
}

/// POST /api/sessions/{session_id}/repair
async fn repair(path: SessionPath, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(action_ok(app_state.engine.repair_session(path.0).await?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_session)))
        .service(
            web::resource("/{session_id}/view/{participant_id}").route(web::get().to(get_view)),
        )
        .service(web::resource("/{session_id}/participants").route(web::post().to(join)))
        .service(
            web::resource("/{session_id}/participants/{participant_id}")
                .route(web::delete().to(leave)),
        )
        .service(web::resource("/{session_id}/config").route(web::put().to(configure)))
        .service(web::resource("/{session_id}/start").route(web::post().to(start)))
        .service(web::resource("/{session_id}/clues").route(web::post().to(submit_clue)))
        .service(web::resource("/{session_id}/force-voting").route(web::post().to(force_voting)))
        .service(web::resource("/{session_id}/votes").route(web::post().to(cast_vote)))
        .service(web::resource("/{session_id}/guess").route(web::post().to(submit_guess)))
        .service(web::resource("/{session_id}/restart").route(web::post().to(restart)))
        .service(web::resource("/{session_id}/stop").route(web::post().to(stop)))
        .service(web::resource("/{session_id}/repair").route(web::post().to(repair)));
}
