// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse traffic patterns for the contact endpoint.

use std::time::Duration;

/// Traffic pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Submissions per second; 0 sends back to back
    pub requests_per_second: f64,
    /// Number of distinct client addresses
    pub unique_ips: usize,
    /// Whether submissions pass validation
    pub valid_payload: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            requests_per_second: 0.0,
            unique_ips: 1,
            valid_payload: true,
        }
    }
}

/// Predefined patterns.
impl AttackConfig {
    /// Single address flooding the form.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Many addresses, each staying within its quota.
    pub fn distributed_attack() -> Self {
        Self {
            total_requests: 500,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// Address rotation beyond the limiter's key capacity.
    pub fn key_churn(unique_ips: usize) -> Self {
        Self {
            total_requests: unique_ips,
            unique_ips,
            ..Default::default()
        }
    }

    /// Junk submissions from one address.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 1,
            valid_payload: false,
            ..Default::default()
        }
    }

    /// Pause between submissions.
    pub fn delay(&self) -> Duration {
        if self.requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / self.requests_per_second)
        } else {
            Duration::ZERO
        }
    }
}
