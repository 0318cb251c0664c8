// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Apply [`require_bearer`] to a router subtree to refuse any request that
//! does not carry a valid bearer token:
//!
//! ```rust,ignore
//! let guard = AuthGuard::new(JwtVerifier::hs256(secret, 0));
//!
//! let protected = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(guard, require_bearer));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, BearerToken, TokenVerifier};

/// Shared state of the auth middleware.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthGuard {
    pub fn new(verifier: impl TokenVerifier + 'static) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

/// Authentication middleware function.
///
/// On success the raw token ([`BearerToken`]) and its
/// [`TokenClaims`](super::TokenClaims) are added to the request extensions.
pub async fn require_bearer(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => return reject(e),
    };

    match guard.verifier.verify(&token) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.subject(), "Bearer token accepted");
            request.extensions_mut().insert(claims);
            request.extensions_mut().insert(BearerToken(token));
            next.run(request).await
        }
        Err(e) => reject(e),
    }
}

fn reject(error: AuthError) -> Response {
    tracing::debug!(error_code = error.error_code(), "Request rejected by auth guard");
    error.into_response()
}

/// Extract the token of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}
