// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All settings are read from the process environment once at startup. A
//! `.env` file in the working directory is loaded first when present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address (IPv4 or IPv6 literal) | `0.0.0.0` |
//! | `PORT` | Server bind port | `5001` |
//! | `BACKEND_BASE_URL` | Root URL of the donations backend | `http://localhost:5000` |
//! | `UPSTREAM_TIMEOUT_SECS` | Timeout for backend and mail relay calls | `10` |
//! | `JWT_SECRET_KEY` | HS256 secret used to verify bearer tokens | Required |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp`/`nbf` | `0` |
//! | `IMAGE_PROXY_REQUIRE_AUTH` | Require a bearer token on `/proxy-image` | `false` |
//! | `CORS_ALLOWED_ORIGIN` | Allowed CORS origin (any origin when unset) | Optional |
//! | `MAIL_SERVER` | SMTP relay host | `smtp.gmail.com` |
//! | `MAIL_PORT` | SMTP relay port | `587` |
//! | `MAIL_USE_TLS` | Use STARTTLS with the relay | `true` |
//! | `MAIL_USERNAME` | SMTP username | Required |
//! | `MAIL_PASSWORD` | SMTP password | Required |
//! | `MAIL_DEFAULT_SENDER` | Sender address of notifications | `from@example.com` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const BACKEND_BASE_URL_ENV: &str = "BACKEND_BASE_URL";
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const IMAGE_PROXY_REQUIRE_AUTH_ENV: &str = "IMAGE_PROXY_REQUIRE_AUTH";
pub const CORS_ALLOWED_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";
pub const MAIL_SERVER_ENV: &str = "MAIL_SERVER";
pub const MAIL_PORT_ENV: &str = "MAIL_PORT";
pub const MAIL_USE_TLS_ENV: &str = "MAIL_USE_TLS";
pub const MAIL_USERNAME_ENV: &str = "MAIL_USERNAME";
pub const MAIL_PASSWORD_ENV: &str = "MAIL_PASSWORD";
pub const MAIL_SENDER_ENV: &str = "MAIL_DEFAULT_SENDER";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAIL_SERVER: &str = "smtp.gmail.com";
const DEFAULT_MAIL_PORT: u16 = 587;
const DEFAULT_MAIL_SENDER: &str = "from@example.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: String,
    pub password: String,
    pub sender: String,
}

/// Bearer token verification settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub leeway_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub backend_base_url: Url,
    pub upstream_timeout: Duration,
    pub jwt: JwtConfig,
    pub image_proxy_require_auth: bool,
    pub cors_allowed_origin: Option<String>,
    pub mail: MailConfig,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default(HOST_ENV, DEFAULT_HOST);
        let port = env_parsed(PORT_ENV, DEFAULT_PORT)?;
        let bind_addr = parse_bind_addr(&host, port)?;

        let backend_base_url = parse_base_url(&env_or_default(
            BACKEND_BASE_URL_ENV,
            DEFAULT_BACKEND_BASE_URL,
        ))?;

        Ok(Self {
            bind_addr,
            backend_base_url,
            upstream_timeout: Duration::from_secs(env_parsed(
                UPSTREAM_TIMEOUT_ENV,
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            jwt: JwtConfig {
                secret: env_required(JWT_SECRET_ENV)?,
                leeway_secs: env_parsed(JWT_LEEWAY_ENV, 0)?,
            },
            image_proxy_require_auth: env_flag(IMAGE_PROXY_REQUIRE_AUTH_ENV, false)?,
            cors_allowed_origin: env_optional(CORS_ALLOWED_ORIGIN_ENV),
            mail: MailConfig {
                server: env_or_default(MAIL_SERVER_ENV, DEFAULT_MAIL_SERVER),
                port: env_parsed(MAIL_PORT_ENV, DEFAULT_MAIL_PORT)?,
                use_tls: env_flag(MAIL_USE_TLS_ENV, true)?,
                username: env_required(MAIL_USERNAME_ENV)?,
                password: env_required(MAIL_PASSWORD_ENV)?,
                sender: env_or_default(MAIL_SENDER_ENV, DEFAULT_MAIL_SENDER),
            },
            log_format: parse_log_format(env_optional(LOG_FORMAT_ENV).as_deref())?,
        })
    }
}

/// Parse the backend root URL. Endpoint paths are appended segment by
/// segment, so the URL must be able to carry a path.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: BACKEND_BASE_URL_ENV,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            name: BACKEND_BASE_URL_ENV,
            reason: format!("{raw} cannot be used as a base URL"),
        });
    }
    Ok(url)
}

/// IPv4 or IPv6 literal, optionally bracketed (`[::1]`).
fn parse_bind_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    let ip = literal
        .parse::<IpAddr>()
        .map_err(|e| ConfigError::Invalid {
            name: HOST_ENV,
            reason: format!("{host}: {e}"),
        })?;
    Ok(SocketAddr::new(ip, port))
}

fn parse_log_format(raw: Option<&str>) -> Result<LogFormat, ConfigError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None | Some("pretty") => Ok(LogFormat::Pretty),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(ConfigError::Invalid {
            name: LOG_FORMAT_ENV,
            reason: format!("expected `json` or `pretty`, got `{other}`"),
        }),
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}

fn env_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    env_optional(name).map_or(Ok(default), |raw| parse_flag(name, &raw))
}

fn env_parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env_optional(name).ok_or(ConfigError::Missing(name))
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
