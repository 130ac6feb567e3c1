// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators.

use contact_gateway::models::ContactSubmission;
use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_ips(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// A submission that passes validation.
pub fn valid_submission(i: usize) -> ContactSubmission {
    ContactSubmission {
        first_name: format!("Visitor{i}"),
        last_name: "Example".to_string(),
        email: format!("visitor{i}@example.com"),
        phone: "+1 555 0100".to_string(),
        message: format!("Hello, I would like a quote for project #{i}."),
    }
}

/// JSON body of [`valid_submission`].
pub fn valid_body(i: usize) -> Value {
    serde_json::to_value(valid_submission(i)).unwrap()
}

/// Bodies that must fail validation.
pub fn invalid_bodies() -> Vec<Value> {
    vec![
        json!({ "email": "a@example.com", "message": "hi" }),
        json!({ "firstName": "   ", "email": "a@example.com", "message": "hi" }),
        json!({ "firstName": "Ada", "message": "hi" }),
        json!({ "firstName": "Ada", "email": "a@example.com" }),
        json!({ "firstName": "Ada", "email": "not-an-email", "message": "hi" }),
        json!({ "firstName": "Ada", "email": "a@example.com", "message": "x".repeat(6000) }),
    ]
}

/// Addresses the validator must reject.
pub fn generate_malformed_emails() -> Vec<&'static str> {
    vec![
        "",
        "plainaddress",
        "@example.com",
        "user@",
        "user@example",
        "user@@example.com",
        "user@exa mple.com",
        "us er@example.com",
        "user@example.",
        "user@.com",
        "a@b@c.com",
    ]
}

/// Addresses the validator must accept.
pub fn generate_well_formed_emails() -> Vec<&'static str> {
    vec![
        "user@example.com",
        "first.last@sub.example.co.uk",
        "user+tag@example.org",
        "x@y.z",
    ]
}
