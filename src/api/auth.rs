use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_sessions::{Expiry, Session};

use super::types::{UnlockRequest, UnlockResponse};
use super::validation::validate_password;
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::constants::session::UNLOCKED_KEY;

// ============================================================================
// Session helpers
// ============================================================================

/// Whether the session carries the unlock flag. Store errors count as locked.
pub async fn is_unlocked(session: &Session) -> bool {
    matches!(session.get::<bool>(UNLOCKED_KEY).await, Ok(Some(true)))
}

/// Rotates the session id, flags it unlocked, and pins an absolute expiry.
/// Returns the expiry instant.
pub async fn mark_unlocked(
    session: &Session,
    duration_ms: u64,
) -> Result<OffsetDateTime, ApiError> {
    let duration_ms = i64::try_from(duration_ms).unwrap_or(i64::MAX);
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(time::Duration::milliseconds(duration_ms))
        .ok_or_else(|| ApiError::internal("Session duration overflows"))?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(UNLOCKED_KEY, true)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session.set_expiry(Some(Expiry::AtDateTime(expires_at)));

    Ok(expires_at)
}

pub async fn clear_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to flush session");
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects JSON requests from sessions that have not been unlocked.
pub async fn auth_middleware(session: Session, request: Request, next: Next) -> Response {
    if is_unlocked(&session).await {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error("Unauthorized")),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/unlock
pub async fn unlock(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<UnlockRequest>,
) -> Result<Json<ApiResponse<UnlockResponse>>, ApiError> {
    validate_password(&payload.password)?;

    state.auth_service().unlock(&payload.password).await?;

    let expires_at = mark_unlocked(&session, state.config().server.session_duration_ms).await?;
    tracing::info!("Session unlocked");

    Ok(Json(ApiResponse::success(UnlockResponse {
        unlocked: true,
        expires_at: expires_at.format(&Rfc3339).ok(),
    })))
}

/// POST /api/lock
pub async fn lock(session: Session) -> Json<ApiResponse<UnlockResponse>> {
    clear_session(&session).await;
    Json(ApiResponse::success(UnlockResponse {
        unlocked: false,
        expires_at: None,
    }))
}
