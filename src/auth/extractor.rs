// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the caller's bearer token.
//!
//! ```rust,ignore
//! async fn my_handler(token: BearerToken) -> impl IntoResponse {
//!     // token.as_str() is forwarded to the backend
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::bearer_token, AuthError};

/// A bearer token that passed the auth guard.
///
/// Only available on routes behind [`require_bearer`](super::require_bearer);
/// elsewhere extraction fails with [`AuthError::MissingAuthHeader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerToken>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Optional bearer token.
///
/// Prefers the token verified by the guard; on unguarded routes falls back
/// to the raw `Authorization: Bearer` header, unverified, so it can still be
/// forwarded to the backend. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct OptionalBearer(pub Option<BearerToken>);

impl<S> FromRequestParts<S> for OptionalBearer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(token) = parts.extensions.get::<BearerToken>().cloned() {
            return Ok(OptionalBearer(Some(token)));
        }

        Ok(OptionalBearer(
            bearer_token(&parts.headers)
                .ok()
                .map(|token| BearerToken(token.to_string())),
        ))
    }
}
