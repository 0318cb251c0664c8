// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mail relay client for donor notifications.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{config::MailConfig, models::NotificationEmail};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mail address `{address}`: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build notification message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP relay failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Delivers composed notifications.
#[async_trait]
pub trait NotificationMailer: Send + Sync {
    async fn send(&self, email: &NotificationEmail) -> Result<(), MailError>;
}

/// Mailer backed by an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig, timeout: Duration) -> Result<Self, MailError> {
        let sender = parse_mailbox(&config.sender)?;
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };

        let transport = builder
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, sender })
    }

    fn build_message(&self, email: &NotificationEmail) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(parse_mailbox(&email.recipient)?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;
        Ok(message)
    }
}

#[async_trait]
impl NotificationMailer for SmtpMailer {
    async fn send(&self, email: &NotificationEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        let response = self.transport.send(message).await?;
        tracing::debug!(code = %response.code(), "Notification accepted by mail relay");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            server: "localhost".to_string(),
            port: 2525,
            use_tls: false,
            username: "user".to_string(),
            password: "secret".to_string(),
            sender: "from@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn builds_plain_text_notification() {
        let mailer = SmtpMailer::new(&config(), Duration::from_secs(1)).unwrap();
        let email = NotificationEmail::for_donation("donor@example.com", "Bicicleta");

        let message = mailer.build_message(&email).unwrap();
        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "donor@example.com");
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("from@example.com")
        );

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected_before_delivery() {
        let mailer = SmtpMailer::new(&config(), Duration::from_secs(1)).unwrap();
        let email = NotificationEmail::for_donation("not an address", "Bicicleta");

        let result = mailer.send(&email).await;
        assert!(matches!(result, Err(MailError::Address { .. })));
    }

    #[test]
    fn invalid_sender_fails_construction() {
        let mut config = config();
        config.sender = "nobody".to_string();
        assert!(matches!(
            SmtpMailer::new(&config, Duration::from_secs(1)),
            Err(MailError::Address { .. })
        ));
    }
}
