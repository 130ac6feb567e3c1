// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory collaborators that record what they were asked to do.

use async_trait::async_trait;
use contact_gateway::delivery::{ContentStore, DeliveryError, Mailer, Notifier};
use contact_gateway::email::EmailMessage;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mailer that keeps every accepted message.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Status { service: "mail", status: 503 });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Notifier that keeps every pushed text.
#[derive(Default)]
pub struct RecordingNotifier {
    texts: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<(), DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Status { service: "whatsapp", status: 500 });
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Content store answering canned query results and keeping created documents.
#[derive(Default)]
pub struct MemoryContentStore {
    responses: Mutex<Vec<(String, Option<String>, Value)>>,
    documents: Mutex<Vec<Value>>,
    failing: AtomicBool,
}

impl MemoryContentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `groq` (bound to `slug`, if any) with `result`.
    pub fn respond(&self, groq: &str, slug: Option<&str>, result: Value) {
        self.responses
            .lock()
            .unwrap()
            .push((groq.to_string(), slug.map(str::to_string), result));
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn documents(&self) -> Vec<Value> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn query(&self, groq: &str, params: &[(&str, &str)]) -> Result<Value, DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Status { service: "cms", status: 500 });
        }
        let slug = params
            .iter()
            .find(|(name, _)| *name == "slug")
            .map(|(_, value)| value.to_string());

        let responses = self.responses.lock().unwrap();
        Ok(responses
            .iter()
            .find(|(q, s, _)| q == groq && *s == slug)
            .map(|(_, _, result)| result.clone())
            .unwrap_or(Value::Null))
    }

    async fn create(&self, document: Value) -> Result<String, DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Status { service: "cms", status: 500 });
        }
        let mut documents = self.documents.lock().unwrap();
        documents.push(document);
        Ok(format!("contact-{}", documents.len()))
    }
}
