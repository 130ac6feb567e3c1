// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the contact gateway.
//!
//! Builds the service over in-memory collaborators and drives the router
//! in-process, plus traffic generators for abuse simulation.

#![allow(dead_code)]

pub mod attacks;
pub mod fakes;
pub mod generators;
pub mod metrics;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use contact_gateway::config::{Config, RateLimitConfig};
use contact_gateway::content::ContentCatalog;
use contact_gateway::email::Mailbox;
use contact_gateway::metrics::Metrics;
use contact_gateway::{router, AdmissionLimiter, AppState, ContactService, ContactValidator};
use fakes::{MemoryContentStore, RecordingMailer, RecordingNotifier};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const OWNER: &str = "owner@example.com";
pub const SENDER: &str = "site@example.com";

/// Knobs for [`TestApp::build`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub max_submissions: u32,
    pub window: Duration,
    pub max_tracked_keys: usize,
    pub notifier: bool,
    pub cms: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            max_submissions: 5,
            window: Duration::from_secs(60),
            max_tracked_keys: 500,
            notifier: true,
            cms: true,
        }
    }
}

/// A router over fake collaborators, with handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingMailer>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<MemoryContentStore>,
}

impl TestApp {
    pub fn build(options: AppOptions) -> Self {
        let config = Config {
            rate_limit: RateLimitConfig {
                max_submissions: options.max_submissions,
                window_ms: options.window.as_millis() as u64,
                max_tracked_keys: options.max_tracked_keys,
                ..Default::default()
            },
            ..Default::default()
        };

        let mailer = RecordingMailer::new();
        let notifier = RecordingNotifier::new();
        let store = MemoryContentStore::new();
        let metrics = Arc::new(Metrics::new().unwrap());
        let limiter = Arc::new(AdmissionLimiter::with_window(
            options.window,
            options.max_tracked_keys,
        ));

        let mut contact = ContactService::new(
            limiter.clone(),
            options.max_submissions,
            ContactValidator::new(config.validation.clone()),
            Mailbox {
                from: SENDER.to_string(),
                to: OWNER.to_string(),
            },
            mailer.clone(),
            metrics.clone(),
        );
        if options.notifier {
            contact = contact.with_notifier(notifier.clone());
        }
        let catalog = if options.cms {
            contact = contact.with_record_store(store.clone());
            Some(ContentCatalog::new(store.clone()))
        } else {
            None
        };

        let state = Arc::new(AppState {
            contact,
            catalog,
            limiter,
            metrics,
            config,
        });

        Self {
            router: router(state.clone()),
            state,
            mailer,
            notifier,
            store,
        }
    }

    /// POST a JSON body to `/api/contact`, optionally from a forwarded address.
    pub async fn post_contact(&self, forwarded_for: Option<&str>, body: &Value) -> TestResponse {
        let mut request = Request::post("/api/contact").header("content-type", "application/json");
        if let Some(addr) = forwarded_for {
            request = request.header("x-forwarded-for", addr);
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

/// Buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
