// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Typed read access to portfolio content.

use crate::delivery::{ContentStore, DeliveryError};
use crate::models::{Project, ProjectSummary, Service, ServiceSummary, Technology};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const PROJECTS_QUERY: &str = r#"*[_type == "project"] | order(order asc) {
  _id,
  title,
  category,
  "slug": slug.current,
  description,
  "mainImageUrl": mainImage.asset->url
}"#;

pub const PROJECT_BY_SLUG_QUERY: &str = r#"*[_type == "project" && slug.current == $slug][0] {
  _id,
  title,
  "slug": slug.current,
  description,
  body,
  "mainImageUrl": mainImage.asset->url,
  "mobileVideoUrl": mobileVideo.asset->url,
  "desktopVideoUrl": desktopVideo.asset->url,
  link,
  githubLink,
  technologies,
  features,
  challenges,
  "screenshots": screenshots[] {
    "url": asset->url,
    alt,
    caption
  }
}"#;

pub const SERVICES_QUERY: &str = r#"*[_type == "service"] | order(title asc) {
  _id,
  title,
  "slug": slug.current,
  description,
  content,
  "imageUrl": image.asset->url,
  features,
  priceRange
}"#;

pub const SERVICE_BY_SLUG_QUERY: &str = r#"*[_type == "service" && slug.current == $slug][0] {
  _id,
  title,
  "slug": slug.current,
  description,
  content,
  "imageUrl": image.asset->url,
  features,
  priceRange,
  "technologies": technologies[]->{
    _id,
    name,
    "slug": slug.current,
    "logoUrl": logo.asset->url,
    category
  },
  "relatedServices": *[_type == "service" && slug.current != $slug][0...3] {
    _id,
    title,
    "slug": slug.current,
    description,
    "imageUrl": image.asset->url
  }
}"#;

pub const TECHNOLOGY_BY_SLUG_QUERY: &str = r#"*[_type == "technology" && slug.current == $slug][0] {
  _id,
  name,
  "slug": slug.current,
  "logoUrl": logo.asset->url,
  description,
  category,
  aboutContent,
  whyWeUse,
  experienceLevel,
  projectsCompleted,
  preferredFor,
  "services": *[_type == "service" && references(^._id)] | order(title asc) {
    _id,
    title,
    "slug": slug.current,
    description,
    "imageUrl": image.asset->url
  },
  "projects": *[_type == "project" && references(^._id)] | order(_createdAt desc)[0...3] {
    _id,
    title,
    "slug": slug.current,
    description,
    "mainImageUrl": mainImage.asset->url
  }
}"#;

/// Portfolio content queries over a [`ContentStore`].
#[derive(Clone)]
pub struct ContentCatalog {
    store: Arc<dyn ContentStore>,
}

impl ContentCatalog {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn projects(&self) -> Result<Vec<ProjectSummary>, DeliveryError> {
        self.list(PROJECTS_QUERY).await
    }

    pub async fn project(&self, slug: &str) -> Result<Option<Project>, DeliveryError> {
        self.by_slug(PROJECT_BY_SLUG_QUERY, slug).await
    }

    pub async fn services(&self) -> Result<Vec<ServiceSummary>, DeliveryError> {
        self.list(SERVICES_QUERY).await
    }

    pub async fn service(&self, slug: &str) -> Result<Option<Service>, DeliveryError> {
        self.by_slug(SERVICE_BY_SLUG_QUERY, slug).await
    }

    pub async fn technology(&self, slug: &str) -> Result<Option<Technology>, DeliveryError> {
        self.by_slug(TECHNOLOGY_BY_SLUG_QUERY, slug).await
    }

    async fn list<T: DeserializeOwned>(&self, groq: &str) -> Result<Vec<T>, DeliveryError> {
        let value = self.store.query(groq, &[]).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        decode(value)
    }

    async fn by_slug<T: DeserializeOwned>(
        &self,
        groq: &str,
        slug: &str,
    ) -> Result<Option<T>, DeliveryError> {
        let value = self.store.query(groq, &[("slug", slug)]).await?;
        if value.is_null() {
            return Ok(None);
        }
        decode(value).map(Some)
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, DeliveryError> {
    serde_json::from_value(value).map_err(|e| DeliveryError::Decode {
        service: "cms",
        reason: e.to_string(),
    })
}
