// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::providers::{BackendError, MailError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Failures of the gateway routes.
///
/// The `Display` text is the fixed message shown to the caller; the
/// downstream cause is logged but never exposed.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("No se cuenta con la informacion suficiente para realizar la notificacion")]
    BadRequest,

    #[error("No se pudo realizar el envio de la notificacion")]
    NotificationDeliveryFailed(#[source] MailError),

    #[error("No se pudo actualizar la disponibilidad de la donacion")]
    UpstreamUpdateFailed(#[source] BackendError),

    #[error("No se pudo consultar el servicio de donaciones")]
    UpstreamUnavailable(#[source] BackendError),

    #[error("El servicio de donaciones respondio con un formato inesperado")]
    UpstreamContractViolation(#[source] BackendError),

    #[error("Imagen no encontrada")]
    NotFound(#[source] BackendError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest | GatewayError::NotificationDeliveryFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::UpstreamUpdateFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UpstreamUnavailable(_) | GatewayError::UpstreamContractViolation(_) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Backend read failures: an unparseable payload breaks the contract,
/// anything else means the backend is unavailable.
impl From<BackendError> for GatewayError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::InvalidPayload { .. } => GatewayError::UpstreamContractViolation(error),
            _ => GatewayError::UpstreamUnavailable(error),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match std::error::Error::source(&self) {
            Some(cause) => tracing::warn!(%status, error = %cause, "{}", self),
            None => tracing::debug!(%status, "{}", self),
        }

        if matches!(self, GatewayError::NotFound(_)) {
            return (
                status,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.to_string(),
            )
                .into_response();
        }
        ApiError::new(status, self.to_string()).into_response()
    }
}
