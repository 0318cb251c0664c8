// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::{auth::OptionalBearer, error::GatewayError, state::AppState};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Stream an uploaded image from the backend.
///
/// The caller's bearer token is forwarded when one is presented. Any
/// failure, whatever the backend status, is reported as the same 404.
#[utoipa::path(
    get,
    path = "/proxy-image/{filename}",
    params(
        ("filename" = String, Path, description = "Name of the uploaded file on the backend")
    ),
    tag = "Images",
    responses(
        (status = 200, description = "Raw image bytes with the backend content type"),
        (status = 404, description = "Imagen no encontrada (plain text)")
    )
)]
pub async fn proxy_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    OptionalBearer(token): OptionalBearer,
) -> Result<Response, GatewayError> {
    let upload = state
        .backend
        .fetch_upload(&filename, token.as_ref())
        .await
        .map_err(GatewayError::NotFound)?;

    let content_type = upload
        .content_type
        .clone()
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    Ok(([(CONTENT_TYPE, content_type)], upload.into_body()).into_response())
}
