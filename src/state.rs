// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::AuthGuard,
    metrics::GatewayMetrics,
    providers::{BackendClient, NotificationMailer},
};

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub mailer: Arc<dyn NotificationMailer>,
    pub metrics: GatewayMetrics,
    pub auth: AuthGuard,
    /// Whether `/proxy-image/{filename}` sits behind the auth guard.
    pub image_proxy_requires_auth: bool,
}

impl AppState {
    pub fn new(
        backend: BackendClient,
        mailer: Arc<dyn NotificationMailer>,
        metrics: GatewayMetrics,
        auth: AuthGuard,
    ) -> Self {
        Self {
            backend,
            mailer,
            metrics,
            auth,
            image_proxy_requires_auth: false,
        }
    }

    pub fn with_image_proxy_auth(mut self, required: bool) -> Self {
        self.image_proxy_requires_auth = required;
        self
    }
}
