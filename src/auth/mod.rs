// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token verification for the gateway routes.
//!
//! ## Auth Flow
//!
//! 1. The caller sends `Authorization: Bearer <JWT>` issued by the token
//!    authority shared with the donations backend
//! 2. The [`middleware::require_bearer`] guard:
//!    - Parses the header
//!    - Verifies the token through a [`TokenVerifier`] (signature, expiry)
//!    - Stores the raw token and its claims in the request extensions
//! 3. Handlers read the token with the [`BearerToken`] extractor and forward
//!    it verbatim to the backend
//!
//! Verification is stateless: nothing is kept between requests.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod verifier;

pub use claims::TokenClaims;
pub use error::AuthError;
pub use extractor::{BearerToken, OptionalBearer};
pub use middleware::{require_bearer, AuthGuard};
pub use verifier::{JwtVerifier, TokenVerifier};
