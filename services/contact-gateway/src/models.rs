// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request payloads and CMS content records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Contact form payload posted by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactSubmission {
    /// Copy with surrounding whitespace stripped from every field.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// First and last name joined, without a dangling space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// `contact` document stored in the CMS for each accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(rename = "_type")]
    pub doc_type: &'static str,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub submitted_at: String,
    pub ip_address: String,
}

impl SubmissionRecord {
    pub const DOC_TYPE: &'static str = "contact";

    pub fn new(submission: &ContactSubmission, client_key: &str, submitted_at: DateTime<Utc>) -> Self {
        Self {
            doc_type: Self::DOC_TYPE,
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            email: submission.email.clone(),
            phone: submission.phone.clone(),
            message: submission.message.clone(),
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ip_address: client_key.to_string(),
        }
    }
}

/// Project as listed on the portfolio index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_image_url: Option<String>,
}

/// Project detail page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Portable Text blocks, passed through untouched
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub mobile_video_url: Option<String>,
    #[serde(default)]
    pub desktop_video_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub challenges: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub screenshots: Vec<Screenshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Budget,
    Midrange,
    Premium,
    Custom,
}

/// Service as listed on the services index or as a related link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
}

/// Reference from a service to a technology it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Service detail page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Portable Text blocks, passed through untouched
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub technologies: Vec<TechnologyRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub related_services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Technology detail page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Portable Text blocks, passed through untouched
    #[serde(default)]
    pub about_content: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub why_we_use: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub projects_completed: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub preferred_for: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub services: Vec<ServiceSummary>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub projects: Vec<ProjectSummary>,
}

/// GROQ projections yield `null` for unset arrays.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
