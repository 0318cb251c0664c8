// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims carried by gateway bearer tokens.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims of an access token issued by the token authority.
///
/// Only `exp` is mandatory. The identity in `sub` is opaque to the gateway:
/// it is never interpreted, only made available for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (identity of the caller, any JSON value)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Value>,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Token identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Token kind (`access` / `refresh`)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenClaims {
    /// Subject rendered for log fields.
    pub fn subject(&self) -> String {
        match &self.sub {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "-".to_string(),
        }
    }
}
