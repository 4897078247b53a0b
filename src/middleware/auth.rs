//! Middleware de autenticación
//!
//! Exige `Authorization: Bearer <token>` en cada request, verifica el token
//! con Firebase e inyecta el usuario autenticado en las extensions.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{state::AppState, utils::errors::AppError};

/// Extraer el bearer token del header Authorization
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware de autenticación por bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?
        .to_string();

    let user = state.verifier.verify(&token).await?;
    debug!("👤 Request autenticada: {}", user.uid);

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
