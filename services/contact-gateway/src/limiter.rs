// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission limiter for the contact endpoint.
//!
//! Fixed-window counting per key: each touch increments the key's count and
//! restarts its expiry, so a key resets only after a full window of silence.
//! Rejected calls still count. Bursts straddling a window boundary can
//! admit up to twice the nominal limit; the limiter is an abuse throttle,
//! not an exact quota.
//!
//! Keys are held in a bounded [`LruTtlCache`], which caps memory no matter
//! how many distinct keys arrive.

use crate::cache::LruTtlCache;
use crate::config::RateLimitConfig;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// A granted admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Requests seen for this key in the current window, this one included
    pub count: u32,
    /// Admissions left before the key is limited
    pub remaining: u32,
    /// Time until the window resets if the key stays silent
    pub reset_in: Duration,
}

/// The key has used up its quota for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rate limit exceeded: {count} requests against a limit of {limit}")]
pub struct QuotaExceeded {
    pub limit: u32,
    pub count: u32,
    /// Minimum wait before the key is admitted again
    pub retry_after: Duration,
}

/// Thread-safe per-key admission limiter.
pub struct AdmissionLimiter {
    window: Duration,
    store: Mutex<LruTtlCache<String, u32>>,
}

impl AdmissionLimiter {
    /// Create a limiter from the service configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_window(config.window_duration(), config.max_tracked_keys)
    }

    /// Create a limiter with an explicit window and key capacity.
    pub fn with_window(window: Duration, max_tracked_keys: usize) -> Self {
        Self {
            window,
            store: Mutex::new(LruTtlCache::new(max_tracked_keys, window)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request for `key` and decide whether it may proceed.
    pub fn admit(&self, limit: u32, key: &str) -> Result<Admission, QuotaExceeded> {
        self.admit_at(limit, key, Instant::now())
    }

    /// Same as [`admit`](Self::admit) with an explicit clock reading.
    pub fn admit_at(&self, limit: u32, key: &str, now: Instant) -> Result<Admission, QuotaExceeded> {
        let count = {
            let mut store = self.lock();
            let count = store.get(key, now).copied().unwrap_or(0).saturating_add(1);
            if let Some(evicted) = store.insert(key.to_string(), count, now) {
                debug!(evicted = %evicted, "Evicted least recently used key");
            }
            count
        };

        if count > limit {
            debug!(key = %key, count, limit, "Quota exceeded");
            return Err(QuotaExceeded {
                limit,
                count,
                retry_after: self.window,
            });
        }

        Ok(Admission {
            count,
            remaining: limit - count,
            reset_in: self.window,
        })
    }

    /// Clean up expired entries (should be called periodically).
    pub fn purge_expired(&self) -> usize {
        let removed = self.lock().purge_expired(Instant::now());
        if removed > 0 {
            debug!(removed, "Purged expired limiter entries");
        }
        removed
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, LruTtlCache<String, u32>> {
        // The critical section cannot leave the store half-updated, so a
        // poisoned lock is still safe to use.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
