// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact gateway.

use crate::config::Config;
use crate::contact::ContactService;
use crate::content::ContentCatalog;
use crate::error::{ApiResponse, AppError, Result};
use crate::limiter::AdmissionLimiter;
use crate::metrics::Metrics;
use crate::models::{ContactSubmission, Project, ProjectSummary, Service, ServiceSummary, Technology};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Key used when the caller's address cannot be determined.
pub const ANONYMOUS_KEY: &str = "anonymous";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Shared application state.
pub struct AppState {
    pub contact: ContactService,
    pub catalog: Option<ContentCatalog>,
    pub limiter: Arc<AdmissionLimiter>,
    pub metrics: Arc<Metrics>,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Caller key: the first `X-Forwarded-For` entry, else [`ANONYMOUS_KEY`].
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(ANONYMOUS_KEY)
        .to_string()
}

/// Accept a contact form submission.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Response> {
    let Json(submission) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected contact payload");
        AppError::BadRequest(rejection.body_text())
    })?;

    let key = client_key(&headers);
    let receipt = state.contact.submit(&key, &submission).await?;

    let body = ApiResponse {
        success: true,
        message: "Message sent successfully! I'll get back to you soon.".to_string(),
        retry_after_secs: None,
    };
    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        RATE_LIMIT_REMAINING,
        HeaderValue::from(receipt.admission.remaining),
    );
    Ok(response)
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response> {
    state.metrics.set_tracked_keys(state.limiter.tracked_keys());
    let text = state.metrics.render().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        AppError::Internal(e.to_string())
    })?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    )
        .into_response())
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProjectSummary>>> {
    let projects = catalog(&state)?.projects().await.map_err(content_failed)?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Project>> {
    catalog(&state)?
        .project(&slug)
        .await
        .map_err(content_failed)?
        .map(Json)
        .ok_or(AppError::NotFound("project"))
}

pub async fn list_services(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ServiceSummary>>> {
    let services = catalog(&state)?.services().await.map_err(content_failed)?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Service>> {
    catalog(&state)?
        .service(&slug)
        .await
        .map_err(content_failed)?
        .map(Json)
        .ok_or(AppError::NotFound("service"))
}

pub async fn get_technology(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Technology>> {
    catalog(&state)?
        .technology(&slug)
        .await
        .map_err(content_failed)?
        .map(Json)
        .ok_or(AppError::NotFound("technology"))
}

fn catalog(state: &AppState) -> Result<&ContentCatalog> {
    state.catalog.as_ref().ok_or(AppError::ContentUnavailable)
}

fn content_failed(err: crate::delivery::DeliveryError) -> AppError {
    warn!(error = %err, "Content query failed");
    AppError::Content(err)
}
