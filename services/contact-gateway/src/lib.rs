// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway
//!
//! Dynamic backend for a portfolio site:
//!
//! - `POST /api/contact` admits, validates and delivers contact submissions
//! - Per-address admission limiting over a bounded LRU/TTL store
//! - Read-through JSON endpoints for headless CMS content
//! - Health and Prometheus metrics endpoints

pub mod cache;
pub mod cms;
pub mod config;
pub mod contact;
pub mod content;
pub mod delivery;
pub mod email;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod models;
pub mod notifier;
pub mod validator;

pub use config::Config;
pub use contact::{ContactService, Receipt, SideEffect, SubmitError};
pub use error::AppError;
pub use handlers::AppState;
pub use limiter::{Admission, AdmissionLimiter, QuotaExceeded};
pub use validator::{ContactValidator, ValidationResult};

use anyhow::bail;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cms::CmsClient;
use crate::content::ContentCatalog;
use crate::delivery::ContentStore;
use crate::email::Mailbox;
use crate::mailer::HttpMailer;
use crate::metrics::Metrics;
use crate::notifier::WhatsAppNotifier;

/// Fixed routes served alongside the configurable metrics path.
const ROUTES: &[&str] = &[
    "/health",
    "/healthz",
    "/api/contact",
    "/api/projects",
    "/api/projects/:slug",
    "/api/services",
    "/api/services/:slug",
    "/api/technologies/:slug",
];

/// Wire the HTTP clients described by `config` into application state.
pub fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    if config.metrics.enabled {
        check_metrics_path(&config.metrics.path)?;
    }

    let timeout = config.http_timeout();
    let limiter = Arc::new(AdmissionLimiter::new(&config.rate_limit));
    let metrics = Arc::new(Metrics::new()?);

    let mailbox = Mailbox {
        from: config.mail.from.clone(),
        to: config.mail.recipient().to_string(),
    };
    let mailer = Arc::new(HttpMailer::new(&config.mail, timeout)?);

    let mut contact = ContactService::new(
        limiter.clone(),
        config.rate_limit.max_submissions,
        ContactValidator::new(config.validation.clone()),
        mailbox,
        mailer,
        metrics.clone(),
    );

    if let Some(notify) = &config.notify {
        contact = contact.with_notifier(Arc::new(WhatsAppNotifier::new(notify, timeout)?));
    }

    let catalog = if config.content.is_configured() {
        let store: Arc<dyn ContentStore> = Arc::new(CmsClient::new(&config.content, timeout)?);
        if config.content.record_submissions {
            contact = contact.with_record_store(store.clone());
        }
        Some(ContentCatalog::new(store))
    } else {
        None
    };

    Ok(Arc::new(AppState {
        contact,
        catalog,
        limiter,
        metrics,
        config,
    }))
}

/// Build the HTTP router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route(ROUTES[0], get(handlers::health))
        .route(ROUTES[1], get(handlers::health))
        .route(ROUTES[2], post(handlers::submit_contact))
        .route(ROUTES[3], get(handlers::list_projects))
        .route(ROUTES[4], get(handlers::get_project))
        .route(ROUTES[5], get(handlers::list_services))
        .route(ROUTES[6], get(handlers::get_service))
        .route(ROUTES[7], get(handlers::get_technology));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(handlers::metrics));
    }

    app.layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reject metrics paths the router would panic on.
fn check_metrics_path(path: &str) -> anyhow::Result<()> {
    if !path.starts_with('/') {
        bail!("metrics path {path:?} must start with '/'");
    }
    if path.contains([':', '*']) {
        bail!("metrics path {path:?} must not contain route parameters");
    }
    if ROUTES.iter().any(|route| overlaps(route, path)) {
        bail!("metrics path {path:?} conflicts with an existing route");
    }
    Ok(())
}

/// Whether `path` would be captured by `route`, segment by segment.
fn overlaps(route: &str, path: &str) -> bool {
    let route: Vec<&str> = route.split('/').collect();
    let path: Vec<&str> = path.split('/').collect();
    route.len() == path.len()
        && route
            .iter()
            .zip(&path)
            .all(|(r, p)| r.starts_with(':') || r == p)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}
