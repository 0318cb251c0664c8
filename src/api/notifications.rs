// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::BearerToken,
    error::GatewayError,
    models::{NotificationEmail, NotificationRequest, NotificationResponse},
    state::AppState,
};

/// Notify a donor that someone is interested in their donation.
///
/// The email goes out first; only once the relay accepted it is the
/// donation marked unavailable on the backend. A failed backend update does
/// not recall the email.
#[utoipa::path(
    post,
    path = "/sendNotification",
    request_body = NotificationRequest,
    tag = "Notifications",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Notification sent successfully", body = NotificationResponse),
        (status = 400, description = "Missing email or id, or the notification could not be delivered"),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 500, description = "The availability of the donation could not be updated")
    )
)]
pub async fn send_notification(
    State(state): State<AppState>,
    token: BearerToken,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> Result<Json<NotificationResponse>, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Unreadable notification body");
        GatewayError::BadRequest
    })?;

    let donation_id = request.donation_id();
    let (Some(email), Some(donation_id)) = (present(request.email), donation_id) else {
        return Err(GatewayError::BadRequest);
    };

    let description = request.description.unwrap_or_else(|| {
        tracing::warn!(%donation_id, "Notification requested without a description");
        String::new()
    });

    let message = NotificationEmail::for_donation(&email, &description);
    state
        .mailer
        .send(&message)
        .await
        .map_err(GatewayError::NotificationDeliveryFailed)?;

    state
        .backend
        .mark_unavailable(&donation_id, &token)
        .await
        .map_err(GatewayError::UpstreamUpdateFailed)?;

    tracing::info!(%donation_id, "Donor notified and donation marked unavailable");
    Ok(Json(NotificationResponse::sent()))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
