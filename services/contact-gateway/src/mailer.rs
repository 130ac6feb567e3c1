// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Email delivery through an HTTP email API (`POST {api_url}/emails`).

use crate::config::MailConfig;
use crate::delivery::{ensure_success, http_client, DeliveryError, Mailer};
use crate::email::EmailMessage;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: &str = "mail";

/// Mail API client.
pub struct HttpMailer {
    endpoint: Url,
    api_key: String,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: &MailConfig, timeout: Duration) -> Result<Self, DeliveryError> {
        if config.api_key.trim().is_empty() {
            return Err(DeliveryError::MissingCredentials { service: SERVICE });
        }
        Ok(Self {
            endpoint: emails_endpoint(&config.api_url)?,
            api_key: config.api_key.clone(),
            client: http_client(SERVICE, timeout)?,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|source| DeliveryError::Transport { service: SERVICE, source })?;

        ensure_success(SERVICE, response)?;
        debug!(to = %message.to, "Email accepted by mail API");
        Ok(())
    }
}

fn emails_endpoint(base: &str) -> Result<Url, DeliveryError> {
    let invalid = |reason: String| DeliveryError::Endpoint { service: SERVICE, reason };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push("emails");
    Ok(url)
}
