// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! WhatsApp notifications through a Twilio-compatible messaging API.

use crate::config::NotifyConfig;
use crate::delivery::{ensure_success, http_client, DeliveryError, Notifier};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: &str = "whatsapp";

/// Messaging API client bound to one sender and one recipient.
pub struct WhatsAppNotifier {
    endpoint: Url,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
    client: reqwest::Client,
}

impl WhatsAppNotifier {
    pub fn new(config: &NotifyConfig, timeout: Duration) -> Result<Self, DeliveryError> {
        if config.account_sid.trim().is_empty() || config.auth_token.trim().is_empty() {
            return Err(DeliveryError::MissingCredentials { service: SERVICE });
        }
        Ok(Self {
            endpoint: messages_endpoint(&config.api_url, &config.account_sid)?,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from: whatsapp_address(&config.from),
            to: whatsapp_address(&config.to),
            client: http_client(SERVICE, timeout)?,
        })
    }

    fn form<'a>(&'a self, body: &'a str) -> [(&'static str, &'a str); 3] {
        [("From", self.from.as_str()), ("To", self.to.as_str()), ("Body", body)]
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    async fn notify(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&self.form(text))
            .send()
            .await
            .map_err(|source| DeliveryError::Transport { service: SERVICE, source })?;

        ensure_success(SERVICE, response)?;
        debug!(to = %self.to, "WhatsApp notification queued");
        Ok(())
    }
}

fn messages_endpoint(base: &str, account_sid: &str) -> Result<Url, DeliveryError> {
    let raw = format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        base.trim_end_matches('/'),
        urlencoding::encode(account_sid)
    );
    Url::parse(&raw).map_err(|e| DeliveryError::Endpoint {
        service: SERVICE,
        reason: e.to_string(),
    })
}

fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}
