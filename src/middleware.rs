use std::sync::Arc;

use axum::{
    extract::State,
    http::{self, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, model::CurrentUser, token::SessionToken, AppState};

/// Resolves the bearer token of the request to a user and hands the handler a
/// `CurrentUser` (plus the token itself, for logout).
pub async fn mw_require_auth<B>(
    State(state): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let user_id = match state.store.session_user(&token).await? {
        Some(user_id) => user_id,
        None => {
            tracing::debug!("no session for presented token");
            return Err(AppError::Unauthenticated);
        }
    };

    request.extensions_mut().insert(CurrentUser { id: user_id });
    request.extensions_mut().insert(token);

    Ok(next.run(request).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Result<SessionToken, AppError> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?
        .trim()
        .parse()
}
