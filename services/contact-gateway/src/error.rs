// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP-facing error type.

use crate::contact::SubmitError;
use crate::delivery::DeliveryError;
use crate::limiter::QuotaExceeded;
use crate::validator::ValidationError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// JSON body shared by success and error responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    RateLimited(#[from] QuotaExceeded),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("email delivery failed: {0}")]
    Delivery(#[source] DeliveryError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("content store is not configured")]
    ContentUnavailable,

    #[error("content store failed: {0}")]
    Content(#[source] DeliveryError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::RateLimited(e) => Self::RateLimited(e),
            SubmitError::Invalid(e) => Self::Validation(e),
            SubmitError::Delivery(e) => Self::Delivery(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ContentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Content(_) => StatusCode::BAD_GATEWAY,
            Self::Delivery(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller; upstream detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::RateLimited(_) => "Too many requests. Please try again later.".to_string(),
            Self::BadRequest(_) => "Invalid request body".to_string(),
            Self::Delivery(_) => "Failed to send message. Please try again later.".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::ContentUnavailable | Self::Content(_) => {
                "Content is temporarily unavailable".to_string()
            }
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after_secs = match &self {
            Self::RateLimited(e) => Some(whole_seconds(e.retry_after)),
            _ => None,
        };
        let body = ApiResponse {
            success: false,
            message: self.public_message(),
            retry_after_secs,
        };

        let mut response = (self.status(), Json(body)).into_response();
        if let Some(secs) = retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Round up so a sub-second window never advertises `Retry-After: 0`.
fn whole_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1)
}
