// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics owned by the application state.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Final outcome of a contact submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Invalid,
    RateLimited,
    DeliveryFailed,
}

impl SubmissionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Invalid => "invalid",
            Self::RateLimited => "rate_limited",
            Self::DeliveryFailed => "delivery_failed",
        }
    }
}

pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    side_effect_failures: IntCounterVec,
    tracked_keys: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("contact_submissions_total", "Contact submissions by outcome"),
            &["outcome"],
        )?;
        let side_effect_failures = IntCounterVec::new(
            Opts::new(
                "contact_side_effect_failures_total",
                "Failed follow-up deliveries after a successful email",
            ),
            &["channel"],
        )?;
        let tracked_keys = IntGauge::new(
            "contact_limiter_tracked_keys",
            "Client keys currently tracked by the admission limiter",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(side_effect_failures.clone()))?;
        registry.register(Box::new(tracked_keys.clone()))?;

        Ok(Self {
            registry,
            submissions,
            side_effect_failures,
            tracked_keys,
        })
    }

    pub fn record_submission(&self, outcome: SubmissionOutcome) {
        self.submissions.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_side_effect_failure(&self, channel: &str) {
        self.side_effect_failures.with_label_values(&[channel]).inc();
    }

    pub fn set_tracked_keys(&self, keys: usize) {
        self.tracked_keys.set(i64::try_from(keys).unwrap_or(i64::MAX));
    }

    pub fn submissions(&self, outcome: SubmissionOutcome) -> u64 {
        self.submissions.with_label_values(&[outcome.as_str()]).get()
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
