// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for traffic simulation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Start time of the simulation
    start_time: Option<Instant>,
    /// End time of the simulation
    end_time: Option<Instant>,
    /// Count of submissions by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Admitted submissions by client address
    admitted_per_ip: HashMap<String, usize>,
    /// Count of submissions by client address
    requests_per_ip: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Delivered to the owner
    Admitted,
    /// Rejected with 429
    RateLimited,
    /// Admitted but failed validation
    Invalid,
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a simulation.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Mark the end of a simulation.
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a submission outcome.
    pub fn record(&mut self, outcome: Outcome, ip: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_ip.entry(ip.to_string()).or_insert(0) += 1;
        if outcome == Outcome::Admitted {
            *self.admitted_per_ip.entry(ip.to_string()).or_insert(0) += 1;
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total submission count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get duration of the simulation.
    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Ratio of rejected to total submissions.
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Admitted)) as f64 / total as f64
    }

    /// Largest number of admissions granted to any one address.
    pub fn max_admitted_per_ip(&self) -> usize {
        self.admitted_per_ip.values().copied().max().unwrap_or(0)
    }

    /// Get number of unique client addresses.
    pub fn unique_ips(&self) -> usize {
        self.requests_per_ip.len()
    }

    /// Get p99 latency in microseconds.
    pub fn p99_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        let idx = (sorted.len() as f64 * 0.99) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            admitted: self.count(Outcome::Admitted),
            rate_limited: self.count(Outcome::RateLimited),
            invalid: self.count(Outcome::Invalid),
            duration_ms: self.duration().as_millis() as u64,
            block_rate: self.block_rate(),
            max_admitted_per_ip: self.max_admitted_per_ip(),
            p99_latency_us: self.p99_latency_us(),
            unique_ips: self.unique_ips(),
        }
    }
}

/// Summary of a simulation.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub admitted: usize,
    pub rate_limited: usize,
    pub invalid: usize,
    pub duration_ms: u64,
    pub block_rate: f64,
    pub max_admitted_per_ip: usize,
    pub p99_latency_us: u64,
    pub unique_ips: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Traffic Report ===")?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f, "Admitted:          {}", self.admitted)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f, "Max Admitted/IP:   {}", self.max_admitted_per_ip)?;
        writeln!(f, "P99 Latency:       {} us", self.p99_latency_us)?;
        writeln!(f, "Unique IPs:        {}", self.unique_ips)?;
        Ok(())
    }
}
