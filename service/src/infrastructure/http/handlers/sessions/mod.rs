use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::AppState;
use crate::domain::app::{self, Command};
use crate::domain::session::SessionId;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::sessions::dto::{CreateSessionRequest, SessionResponse};

mod dto;

pub async fn create_session<S: AppState>(
    State(state): State<S>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<ApiSuccess<SessionResponse>, ApiError> {
    let (session_id, session) = state.sessions().create(state.options().clone()).await;
    app::start(&session.app, state.data(), state.verifier(), &request.path).await;

    let response = SessionResponse::after_update(session_id, &session.app).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, response))
}

pub async fn get_session<S: AppState>(
    Path(session_id): Path<SessionId>,
    State(state): State<S>,
) -> Result<ApiSuccess<SessionResponse>, ApiError> {
    let session = state.sessions().get(&session_id).await.ok_or(ApiError::NotFound)?;

    let response = SessionResponse::current(session_id, &session.app).await?;
    Ok(ApiSuccess::new(StatusCode::OK, response))
}

pub async fn run_command<S: AppState>(
    Path(session_id): Path<SessionId>,
    State(state): State<S>,
    Json(command): Json<Command>,
) -> Result<ApiSuccess<SessionResponse>, ApiError> {
    let session = state.sessions().get(&session_id).await.ok_or(ApiError::NotFound)?;
    tracing::debug!(session = %session_id, ?command, "running command");
    app::dispatch(&session.app, state.data(), state.verifier(), command).await;

    let response = SessionResponse::after_update(session_id, &session.app).await?;
    Ok(ApiSuccess::new(StatusCode::OK, response))
}

pub async fn close_session<S: AppState>(
    Path(session_id): Path<SessionId>,
    State(state): State<S>,
) -> Result<StatusCode, ApiError> {
    if state.sessions().remove(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
