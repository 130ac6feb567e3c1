// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway Service
//!
//! Backend for a portfolio site's contact form and CMS content.
//!
//! ## Configuration
//!
//! A `.env` file is loaded first if present. Settings then come from the
//! optional file named by `CONTACT_CONFIG` and from `CONTACT__*` variables:
//!
//! - `CONTACT__BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT__RATE_LIMIT__MAX_SUBMISSIONS`: Submissions per address per window (default: 5)
//! - `CONTACT__RATE_LIMIT__WINDOW_MS`: Window length in milliseconds (default: 60000)
//! - `CONTACT__MAIL__API_KEY`, `CONTACT__MAIL__FROM`: Required for email delivery
//! - `CONTACT__NOTIFY__*`: Optional WhatsApp notification
//! - `CONTACT__CONTENT__PROJECT_ID`: Enables CMS content and submission records

use anyhow::{bail, Context};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gateway::{build_state, router, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;
    if config.mail.api_key.trim().is_empty() || config.mail.from.trim().is_empty() {
        bail!("CONTACT__MAIL__API_KEY and CONTACT__MAIL__FROM must be set");
    }

    info!(
        bind_addr = %config.bind_addr,
        max_submissions = config.rate_limit.max_submissions,
        window_ms = config.rate_limit.window_ms,
        max_tracked_keys = config.rate_limit.max_tracked_keys,
        whatsapp = config.notify.is_some(),
        cms = config.content.is_configured(),
        "Starting contact gateway"
    );

    let cleanup_interval = config.rate_limit.cleanup_interval();
    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = build_state(config)?;

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let purged = cleanup_state.limiter.purge_expired();
            let tracked = cleanup_state.limiter.tracked_keys();
            cleanup_state.metrics.set_tracked_keys(tracked);
            debug!(purged, tracked, "Limiter sweep complete");
        }
    });

    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
