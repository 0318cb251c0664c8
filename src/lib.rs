// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Donations Gateway
//!
//! Thin HTTP gateway in front of the donations backend: filters the
//! donation listing, notifies donors by email, and proxies uploaded images.
//!
//! ## Modules
//!
//! - `api` - HTTP route handlers and router (Axum)
//! - `auth` - Bearer token verification (JWT)
//! - `metrics` - Prometheus request metrics
//! - `providers` - Donations backend and mail relay clients

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod state;
