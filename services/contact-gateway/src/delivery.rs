// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound collaborators: email, messaging and the content store.
//!
//! Each is a trait so the request layer can be exercised against fakes.
//! The HTTP implementations live in [`crate::mailer`], [`crate::notifier`]
//! and [`crate::cms`].

use crate::email::EmailMessage;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to an external service.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} returned an unexpected payload: {reason}")]
    Decode { service: &'static str, reason: String },

    #[error("invalid {service} endpoint: {reason}")]
    Endpoint { service: &'static str, reason: String },

    #[error("{service} credentials are not configured")]
    MissingCredentials { service: &'static str },
}

impl DeliveryError {
    /// Name of the service that failed.
    pub fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. }
            | Self::Endpoint { service, .. }
            | Self::MissingCredentials { service } => *service,
        }
    }
}

/// Sends the owner notification email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}

/// Pushes a short text notification to the owner.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Headless CMS access.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a read-only GROQ query; `params` bind `$name` string parameters.
    async fn query(
        &self,
        groq: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, DeliveryError>;

    /// Create a document, returning its id.
    async fn create(&self, document: serde_json::Value) -> Result<String, DeliveryError>;
}

/// Shared HTTP client construction with a request timeout.
pub(crate) fn http_client(
    service: &'static str,
    timeout: Duration,
) -> Result<reqwest::Client, DeliveryError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("contact-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| DeliveryError::Transport { service, source })
}

/// Map a non-success response to [`DeliveryError::Status`].
pub(crate) fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, DeliveryError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DeliveryError::Status {
            service,
            status: status.as_u16(),
        })
    }
}
