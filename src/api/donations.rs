// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    auth::BearerToken,
    error::GatewayError,
    models::{Donation, DonationFilter},
    state::AppState,
};

/// List the donations with the given filters applied.
///
/// The full listing is read from the backend with the caller's token and
/// filtered here; backend order is preserved.
#[utoipa::path(
    get,
    path = "/filteredDonations",
    params(DonationFilter),
    tag = "Donations",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Filtered donations returned successfully", body = [Donation]),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 502, description = "The donations backend failed or answered with an unexpected payload")
    )
)]
pub async fn filtered_donations(
    State(state): State<AppState>,
    token: BearerToken,
    Query(filter): Query<DonationFilter>,
) -> Result<Json<Vec<Donation>>, GatewayError> {
    let donations = state.backend.list_donations(&token).await?;
    let total = donations.len();

    let filtered = filter.apply(donations);
    tracing::debug!(total, matched = filtered.len(), "Filtered donation listing");

    Ok(Json(filtered))
}
