//! Caller identification middleware
//!
//! Every request gets a [`ClientIdentity`]: the bearer token subject when a
//! valid HS256 token is presented, plus a session id taken from
//! `X-Session-Id` or freshly generated. The session id is echoed back on the
//! response so browsers can keep it. Invalid tokens are not an error; the
//! caller is simply treated as anonymous.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{constants::SESSION_HEADER, error::AppError, models::ClientIdentity, state::AppState};

const MAX_SESSION_ID_LEN: usize = 128;

/// Token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier
    pub sub: String,
    pub exp: usize,
}

/// Subject of a valid token, `None` otherwise
pub fn verify_token(token: &str, secret: &str) -> Option<String> {
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) if !data.claims.sub.trim().is_empty() => Some(data.claims.sub),
        Ok(_) => None,
        Err(e) => {
            debug!(error = ?e, "Ignoring invalid bearer token");
            None
        }
    }
}

/// Work out who is calling from request headers
pub fn resolve_identity(headers: &HeaderMap, jwt_secret: Option<&str>) -> ClientIdentity {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= MAX_SESSION_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let user_id = jwt_secret.and_then(|secret| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .and_then(|token| verify_token(token.trim(), secret))
    });

    match user_id {
        Some(user_id) => ClientIdentity::authenticated(user_id, session_id),
        None => ClientIdentity::anonymous(session_id),
    }
}

/// Attach a [`ClientIdentity`] to the request and echo the session id
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = resolve_identity(request.headers(), state.config().auth.jwt_secret.as_deref());
    let session_id = identity.session_id.clone();
    request.extensions_mut().insert(identity);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClientIdentity>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Identity that must belong to a signed-in account
pub struct AuthenticatedUser(pub ClientIdentity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        self.0.client_id()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = ClientIdentity::from_request_parts(parts, state).await?;
        if identity.is_authenticated() {
            Ok(AuthenticatedUser(identity))
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
