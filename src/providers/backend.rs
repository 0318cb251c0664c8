// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Donations backend client.
//!
//! Every call is a single request with no retry. The caller's bearer token
//! is forwarded verbatim when one is given.

use std::time::Duration;

use axum::body::Body;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::{auth::BearerToken, models::Donation};

const DONATIONS_PATH: [&str; 2] = ["api", "donations"];
const UPLOADS_PATH: [&str; 2] = ["api", "uploads"];

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}")]
    Status { endpoint: String, status: StatusCode },

    #[error("{endpoint} returned an invalid payload: {reason}")]
    InvalidPayload { endpoint: String, reason: String },
}

/// An uploaded file being streamed back from the backend.
#[derive(Debug)]
pub struct Upload {
    /// `Content-Type` reported by the backend, if any.
    pub content_type: Option<String>,
    response: Response,
}

impl Upload {
    /// Stream the remaining response body without buffering it.
    pub fn into_body(self) -> Body {
        Body::from_stream(self.response.bytes_stream())
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    http: Client,
}

impl BackendClient {
    /// `base_url` must be able to carry a path
    /// (see [`parse_base_url`](crate::config::parse_base_url)).
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// `GET /api/donations`
    pub async fn list_donations(&self, token: &BearerToken) -> Result<Vec<Donation>, BackendError> {
        let url = self.endpoint(&DONATIONS_PATH, None);
        let endpoint = format!("GET {}", url.path());

        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|source| BackendError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        let response = ensure_success(response, &endpoint)?;

        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|e| BackendError::InvalidPayload {
            endpoint,
            reason: e.to_string(),
        })
    }

    /// `PUT /api/donations/{id}`: the backend marks the donation as no
    /// longer available.
    pub async fn mark_unavailable(
        &self,
        donation_id: &str,
        token: &BearerToken,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&DONATIONS_PATH, Some(donation_id));
        let endpoint = format!("PUT {}", url.path());

        let response = self
            .http
            .put(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|source| BackendError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        ensure_success(response, &endpoint)?;
        Ok(())
    }

    /// `GET /api/uploads/{filename}`. Anything but `200 OK` is an error.
    pub async fn fetch_upload(
        &self,
        filename: &str,
        token: Option<&BearerToken>,
    ) -> Result<Upload, BackendError> {
        let url = self.endpoint(&UPLOADS_PATH, Some(filename));
        let endpoint = format!("GET {}", url.path());

        let response = with_token(self.http.get(url), token)
            .send()
            .await
            .map_err(|source| BackendError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(BackendError::Status {
                endpoint,
                status: response.status(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Upload {
            content_type,
            response,
        })
    }

    /// Append `segments` (and the optional caller-supplied `item`) to the
    /// base URL. Each segment is percent-encoded, so `item` reaches the
    /// backend as a single path segment whatever it contains.
    fn endpoint(&self, segments: &[&str], item: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
            if let Some(item) = item {
                path.push(item);
            }
        }
        url
    }
}

fn with_token(builder: RequestBuilder, token: Option<&BearerToken>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token.as_str()),
        None => builder,
    }
}

fn ensure_success(response: Response, endpoint: &str) -> Result<Response, BackendError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status {
            endpoint: endpoint.to_string(),
            status: response.status(),
        })
    }
}
