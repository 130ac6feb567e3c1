// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gateway.
//!
//! Values come from an optional file named by `CONTACT_CONFIG` and from
//! `CONTACT__*` environment variables, where `__` separates nested keys
//! (`CONTACT__RATE_LIMIT__WINDOW_MS=60000`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming an optional configuration file.
pub const CONFIG_FILE_ENV: &str = "CONTACT_CONFIG";

/// Configuration for the contact gateway service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    /// Timeout applied to every outbound HTTP call, in seconds (default: 10)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Admission limiting for the contact endpoint
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Contact form validation limits
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Email delivery to the site owner
    #[serde(default)]
    pub mail: MailConfig,

    /// Optional WhatsApp notification of new submissions
    #[serde(default)]
    pub notify: Option<NotifyConfig>,

    /// Headless CMS access
    #[serde(default)]
    pub content: ContentConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Admission limiter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions admitted per key per window (default: 5)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Window after which a key's count resets, in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Distinct keys tracked at once; least recently used are evicted (default: 500)
    #[serde(default = "default_max_tracked_keys")]
    pub max_tracked_keys: usize,

    /// Interval between sweeps of expired entries, in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Contact form validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum characters in name, email and phone fields (default: 200)
    #[serde(default = "default_max_field_len")]
    pub max_field_len: usize,

    /// Maximum characters in the message (default: 5000)
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// HTTP email API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Base URL of the email API (default: https://api.resend.com)
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,

    /// Bearer token for the email API
    #[serde(default)]
    pub api_key: String,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Owner address receiving submissions; falls back to `from`
    #[serde(default)]
    pub to: Option<String>,
}

/// WhatsApp notification settings for a Twilio-compatible messaging API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Base URL of the messaging API (default: https://api.twilio.com)
    #[serde(default = "default_notify_api_url")]
    pub api_url: String,

    pub account_sid: String,

    pub auth_token: String,

    /// Sending number, with or without the `whatsapp:` prefix
    pub from: String,

    /// Owner number, with or without the `whatsapp:` prefix
    pub to: String,
}

/// Headless CMS settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// CMS project identifier; empty disables content access
    #[serde(default)]
    pub project_id: String,

    /// Dataset name (default: production)
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// API version date without the leading `v` (default: 2024-01-01)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Token for authenticated reads and document writes
    #[serde(default)]
    pub token: Option<String>,

    /// Serve reads from the CDN host (default: true)
    #[serde(default = "default_true")]
    pub use_cdn: bool,

    /// Store each accepted submission as a CMS document (default: true)
    #[serde(default = "default_true")]
    pub record_submissions: bool,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allowed_origins() -> String {
    "https://localhost".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_max_submissions() -> u32 {
    5
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_tracked_keys() -> usize {
    500
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_max_field_len() -> usize {
    200
}

fn default_max_message_len() -> usize {
    5000
}

fn default_mail_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_notify_api_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2024-01-01".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origins: default_allowed_origins(),
            http_timeout_secs: default_http_timeout_secs(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            mail: MailConfig::default(),
            notify: None,
            content: ContentConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_ms: default_window_ms(),
            max_tracked_keys: default_max_tracked_keys(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_field_len: default_max_field_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_key: String::new(),
            from: String::new(),
            to: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            token: None,
            use_cdn: default_true(),
            record_submissions: default_true(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Load configuration from the optional file and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            builder = builder.add_source(::config::File::with_name(&path));
        }
        builder
            .add_source(::config::Environment::with_prefix("CONTACT").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Timeout for outbound HTTP calls.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Parsed CORS origins, skipping blanks.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Get the expired-entry sweep interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl MailConfig {
    /// Address that receives submissions.
    pub fn recipient(&self) -> &str {
        match self.to.as_deref() {
            Some(to) if !to.trim().is_empty() => to,
            _ => &self.from,
        }
    }
}

impl ContentConfig {
    pub fn is_configured(&self) -> bool {
        !self.project_id.trim().is_empty()
    }
}
