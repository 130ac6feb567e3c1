// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sanity HTTP API client.
//!
//! Reads go to `/data/query/{dataset}` (on the CDN host when enabled),
//! writes to `/data/mutate/{dataset}` on the live API host.

use crate::config::ContentConfig;
use crate::delivery::{ensure_success, http_client, ContentStore, DeliveryError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: &str = "cms";
const API_HOST: &str = "api.sanity.io";
const CDN_HOST: &str = "apicdn.sanity.io";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutateResponse {
    transaction_id: String,
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

/// CMS client for one project and dataset.
pub struct CmsClient {
    query_base: Url,
    mutate_base: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl CmsClient {
    pub fn new(config: &ContentConfig, timeout: Duration) -> Result<Self, DeliveryError> {
        let read_host = if config.use_cdn { CDN_HOST } else { API_HOST };
        Ok(Self {
            query_base: endpoint(config, read_host, "query")?,
            mutate_base: endpoint(config, API_HOST, "mutate")?,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            client: http_client(SERVICE, timeout)?,
        })
    }

    fn query_url(&self, groq: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.query_base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", groq);
            for (name, value) in params {
                // Parameters are JSON literals.
                let literal = Value::String((*value).to_string()).to_string();
                pairs.append_pair(&format!("${name}"), &literal);
            }
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContentStore for CmsClient {
    async fn query(&self, groq: &str, params: &[(&str, &str)]) -> Result<Value, DeliveryError> {
        let request = self.client.get(self.query_url(groq, params));
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|source| DeliveryError::Transport { service: SERVICE, source })?;

        let body: QueryResponse = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| DeliveryError::Decode {
                service: SERVICE,
                reason: e.to_string(),
            })?;
        Ok(body.result)
    }

    async fn create(&self, document: Value) -> Result<String, DeliveryError> {
        let token = self
            .token
            .as_deref()
            .ok_or(DeliveryError::MissingCredentials { service: SERVICE })?;

        let mut url = self.mutate_base.clone();
        url.query_pairs_mut().append_pair("returnIds", "true");

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&mutation(document))
            .send()
            .await
            .map_err(|source| DeliveryError::Transport { service: SERVICE, source })?;

        let body: MutateResponse = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| DeliveryError::Decode {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        let id = body
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .unwrap_or(body.transaction_id);
        debug!(%id, "Created CMS document");
        Ok(id)
    }
}

fn endpoint(config: &ContentConfig, host: &str, action: &str) -> Result<Url, DeliveryError> {
    let raw = format!(
        "https://{}.{}/v{}/data/{}/{}",
        config.project_id.trim(),
        host,
        config.api_version.trim_start_matches('v'),
        action,
        urlencoding::encode(&config.dataset)
    );
    Url::parse(&raw).map_err(|e| DeliveryError::Endpoint {
        service: SERVICE,
        reason: e.to_string(),
    })
}

fn mutation(document: Value) -> Value {
    json!({ "mutations": [{ "create": document }] })
}
