//! Auth API endpoints: account lifecycle and session management.

use api_types::auth::{
    PasswordResetConfirm, PasswordResetRequest, PasswordUpdate, SessionCreated, SessionView,
    SignIn, SignUp,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{SecuritySettingsPatch, sessions};

use crate::{ServerError, server::ServerState};

pub async fn sign_up(
    State(state): State<ServerState>,
    Json(payload): Json<SignUp>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .sign_up(&payload.email, &payload.password)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn sign_in(
    State(state): State<ServerState>,
    Json(payload): Json<SignIn>,
) -> Result<Json<SessionCreated>, ServerError> {
    let session = state
        .engine
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(SessionCreated {
        token: session.token,
        user_id: session.user_id,
    }))
}

pub async fn session(Extension(session): Extension<sessions::Model>) -> Json<SessionView> {
    Json(SessionView {
        user_id: session.user_id,
        created_at: session.created_at,
    })
}

pub async fn sign_out(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.sign_out(&session.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Always answers 202: unknown emails must be indistinguishable from known
/// ones. There is no mail transport, so a generated code lands in the log
/// for out-of-band delivery.
pub async fn reset_request(
    State(state): State<ServerState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<StatusCode, ServerError> {
    if let Some(code) = state.engine.request_password_reset(&payload.email).await? {
        tracing::info!(email = %payload.email, code, "password reset code issued");
    }
    Ok(StatusCode::ACCEPTED)
}

pub async fn reset_confirm(
    State(state): State<ServerState>,
    Json(payload): Json<PasswordResetConfirm>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .redeem_password_reset(&payload.email, &payload.code, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set a new password for the signed-in user and stamp the security
/// settings row. Callers verify the current password first by signing in
/// again.
pub async fn update_password(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PasswordUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_password(&session.user_id, &payload.new_password)
        .await?;

    state
        .engine
        .update_security_settings(
            &session.user_id,
            SecuritySettingsPatch {
                last_password_change: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
