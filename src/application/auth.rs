use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::users::User;

const BEARER_PREFIX: &str = "Bearer ";
const INVALID_HEADER: &str = "Invalid authorization header";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Extension type to carry the authenticated user through request handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthenticated(INVALID_HEADER))?;

    let value = value.to_str().map_err(|err| {
        warn!(error = %err, "authorization header contains invalid characters");
        AppError::Unauthenticated(INVALID_HEADER)
    })?;

    value
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.trim().is_empty())
        .ok_or(AppError::Unauthenticated(INVALID_HEADER))
}

/// Auth gate composed in front of every protected route: resolves the bearer
/// token through the identity service and stores the user in the request
/// extensions. Rejects before the handler (or any body extraction) runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.to_string();

    let user = state.identity.user_for_token(&token).await.map_err(|err| {
        warn!(error = %err, "bearer token rejected");
        AppError::Unauthenticated(INVALID_TOKEN)
    })?;

    Span::current().record("user.id", tracing::field::display(&user.id));
    request.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated(INVALID_HEADER).into())
    }
}
