// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Owner-facing renderings of a contact submission.

use crate::models::ContactSubmission;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

/// WhatsApp bodies are capped well below the messaging API's 1600 chars.
const MAX_TEXT_MESSAGE_CHARS: usize = 1000;

/// Sender and recipient of owner notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub from: String,
    pub to: String,
}

/// Email handed to the mail API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// Build the notification email for a (normalized, validated) submission.
pub fn render_email(submission: &ContactSubmission, mailbox: &Mailbox) -> EmailMessage {
    EmailMessage {
        from: mailbox.from.clone(),
        to: mailbox.to.clone(),
        reply_to: submission.email.clone(),
        subject: format!("New Contact Form Message from {}", submission.full_name()),
        html: render_html(submission),
    }
}

fn render_html(submission: &ContactSubmission) -> String {
    let name = encode_text(&submission.full_name()).into_owned();
    let email_text = encode_text(&submission.email).into_owned();
    let email_attr = encode_double_quoted_attribute(&submission.email).into_owned();
    let phone = if submission.phone.is_empty() {
        "Not provided".to_string()
    } else {
        encode_text(&submission.phone).into_owned()
    };
    let message = encode_text(&submission.message)
        .replace("\r\n", "\n")
        .replace('\n', "<br>");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f9f9f9;">
  <div style="background-color: #0a0a0a; color: white; padding: 20px; text-align: center; border-radius: 10px 10px 0 0;">
    <h1 style="margin: 0; font-size: 24px;">New Contact Form Submission</h1>
  </div>
  <div style="background-color: white; padding: 30px; border-radius: 0 0 10px 10px;">
    <table style="width: 100%; border-collapse: collapse;">
      <tr><td style="padding: 10px 0; font-weight: bold;">Name:</td><td style="padding: 10px 0;">{name}</td></tr>
      <tr><td style="padding: 10px 0; font-weight: bold;">Email:</td><td style="padding: 10px 0;"><a href="mailto:{email_attr}">{email_text}</a></td></tr>
      <tr><td style="padding: 10px 0; font-weight: bold;">Phone:</td><td style="padding: 10px 0;">{phone}</td></tr>
    </table>
    <h3 style="margin-top: 20px;">Message:</h3>
    <div style="background-color: #f5f5f5; padding: 15px; border-radius: 5px; line-height: 1.6;">{message}</div>
    <p style="margin-top: 30px; text-align: center; color: #999; font-size: 12px;">This email was sent from your portfolio contact form.</p>
  </div>
</div>"#
    )
}

/// Plain-text summary for the WhatsApp notification.
pub fn render_text(submission: &ContactSubmission) -> String {
    let phone = if submission.phone.is_empty() {
        "Not provided"
    } else {
        submission.phone.as_str()
    };
    let mut message: String = submission.message.chars().take(MAX_TEXT_MESSAGE_CHARS).collect();
    if message.len() < submission.message.len() {
        message.push('…');
    }

    format!(
        "New contact form message\nName: {}\nEmail: {}\nPhone: {}\n\n{}",
        submission.full_name(),
        submission.email,
        phone,
        message
    )
}
