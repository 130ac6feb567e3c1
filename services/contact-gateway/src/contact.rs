// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission pipeline.
//!
//! admit → validate → email the owner → (notify ‖ record)
//!
//! The email is the primary effect and its failure fails the submission.
//! Notification and CMS record run concurrently afterwards; their failures
//! are logged and counted but never turn a delivered email into an error.

use crate::delivery::{ContentStore, DeliveryError, Mailer, Notifier};
use crate::email::{render_email, render_text, Mailbox};
use crate::limiter::{Admission, AdmissionLimiter, QuotaExceeded};
use crate::metrics::{Metrics, SubmissionOutcome};
use crate::models::{ContactSubmission, SubmissionRecord};
use crate::validator::{ContactValidator, ValidationError, ValidationResult};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a submission was not delivered.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    RateLimited(#[from] QuotaExceeded),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("email delivery failed: {0}")]
    Delivery(#[source] DeliveryError),
}

/// Outcome of a follow-up delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Channel not configured
    Skipped,
    Delivered,
    Failed(String),
}

/// Result of a delivered submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub admission: Admission,
    pub notification: SideEffect,
    pub record: SideEffect,
}

/// Submission pipeline with its collaborators.
pub struct ContactService {
    limiter: Arc<AdmissionLimiter>,
    max_submissions: u32,
    validator: ContactValidator,
    mailbox: Mailbox,
    mailer: Arc<dyn Mailer>,
    notifier: Option<Arc<dyn Notifier>>,
    records: Option<Arc<dyn ContentStore>>,
    metrics: Arc<Metrics>,
}

impl ContactService {
    pub fn new(
        limiter: Arc<AdmissionLimiter>,
        max_submissions: u32,
        validator: ContactValidator,
        mailbox: Mailbox,
        mailer: Arc<dyn Mailer>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            limiter,
            max_submissions,
            validator,
            mailbox,
            mailer,
            notifier: None,
            records: None,
            metrics,
        }
    }

    /// Also push a WhatsApp notification for each delivered submission.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Also store each delivered submission as a CMS document.
    pub fn with_record_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.records = Some(store);
        self
    }

    /// Run one submission from `client_key` through the pipeline.
    pub async fn submit(
        &self,
        client_key: &str,
        submission: &ContactSubmission,
    ) -> Result<Receipt, SubmitError> {
        let admission = self.limiter.admit(self.max_submissions, client_key);
        self.metrics.set_tracked_keys(self.limiter.tracked_keys());
        let admission = match admission {
            Ok(admission) => admission,
            Err(exceeded) => {
                info!(client = %client_key, count = exceeded.count, "Submission rate limited");
                self.metrics.record_submission(SubmissionOutcome::RateLimited);
                return Err(exceeded.into());
            }
        };

        let submission = submission.normalized();
        if let ValidationResult::Invalid(err) = self.validator.validate(&submission) {
            info!(client = %client_key, error = %err, "Submission failed validation");
            self.metrics.record_submission(SubmissionOutcome::Invalid);
            return Err(err.into());
        }

        let email = render_email(&submission, &self.mailbox);
        if let Err(err) = self.mailer.send(&email).await {
            error!(client = %client_key, error = %err, "Failed to send contact email");
            self.metrics.record_submission(SubmissionOutcome::DeliveryFailed);
            return Err(SubmitError::Delivery(err));
        }

        let (notification, record) = tokio::join!(
            self.notify_owner(&submission),
            self.store_record(&submission, client_key)
        );

        self.metrics.record_submission(SubmissionOutcome::Accepted);
        info!(
            client = %client_key,
            remaining = admission.remaining,
            notification = ?notification,
            record = ?record,
            "Contact submission delivered"
        );

        Ok(Receipt {
            admission,
            notification,
            record,
        })
    }

    async fn notify_owner(&self, submission: &ContactSubmission) -> SideEffect {
        let Some(notifier) = &self.notifier else {
            return SideEffect::Skipped;
        };
        match notifier.notify(&render_text(submission)).await {
            Ok(()) => SideEffect::Delivered,
            Err(err) => self.side_effect_failed(err),
        }
    }

    async fn store_record(&self, submission: &ContactSubmission, client_key: &str) -> SideEffect {
        let Some(store) = &self.records else {
            return SideEffect::Skipped;
        };
        let record = SubmissionRecord::new(submission, client_key, chrono::Utc::now());
        let document = match serde_json::to_value(&record) {
            Ok(document) => document,
            Err(err) => {
                return self.side_effect_failed(DeliveryError::Decode {
                    service: "cms",
                    reason: err.to_string(),
                })
            }
        };
        match store.create(document).await {
            Ok(_) => SideEffect::Delivered,
            Err(err) => self.side_effect_failed(err),
        }
    }

    fn side_effect_failed(&self, err: DeliveryError) -> SideEffect {
        warn!(channel = err.service(), error = %err, "Follow-up delivery failed");
        self.metrics.record_side_effect_failure(err.service());
        SideEffect::Failed(err.to_string())
    }
}
