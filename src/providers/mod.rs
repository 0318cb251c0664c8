// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Clients for the services the gateway sits in front of.
//!
//! - `backend` - donations backend REST API (listing, availability, uploads)
//! - `mail` - SMTP relay used for donor notifications

pub mod backend;
pub mod mail;

pub use backend::{BackendClient, BackendError, Upload};
pub use mail::{MailError, NotificationMailer, SmtpMailer};
