//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Paths under `/api/` reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/users/signup",
    "/api/users/login",
    "/api/users/refresh",
];

/// Require a valid session token on every `/api/` request.
///
/// Extracts the `Authorization: Bearer <token>` header, validates the JWT
/// and injects [`CurrentUser`] into request extensions. Skips OPTIONS
/// requests (CORS preflight), non-API paths and the public auth routes.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // non-API routes fall through to their own 404s
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or(AppError::InvalidToken)?,
        None => {
            tracing::warn!(target: "auth", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt().validate_token(token) {
        Ok(claims) => {
            // a refresh token never grants API access
            if claims.is_refresh() {
                return Err(AppError::InvalidToken);
            }
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "auth", error = %e, uri = %req.uri(), "Token rejected");
            match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}
