//! # `mealworm-notion`: Notion Document Source
//!
//! This crate provides the Notion transport for the `mealworm` pipeline as
//! a self-contained plugin: it implements the `MealSource` trait from the
//! core `mealworm` library on top of the Notion REST API, handling
//! authentication headers, the search and database-query endpoints, block
//! children, and cursor pagination.

use async_trait::async_trait;
use mealworm::document::{Block, DocumentRecord};
use mealworm::source::{ContainerRef, MealSource, SourceError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use thiserror::Error;
use tracing::{debug, warn};

/// The API version sent when `NOTION_VERSION` is not set.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("Failed to fetch from the Notion API: {0}")]
    Fetch(String),
    #[error("The Notion API returned an error: {0}")]
    ApiError(String),
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        NotionError::Fetch(err.to_string())
    }
}

/// A helper to convert the specific `NotionError` into the generic
/// `mealworm::source::SourceError`.
impl From<NotionError> for SourceError {
    fn from(err: NotionError) -> Self {
        match err {
            NotionError::Fetch(msg) => SourceError::Fetch(msg),
            NotionError::ApiError(msg) => SourceError::Api(msg),
            NotionError::MissingEnvVar(name) => SourceError::MissingEnvVar(name),
        }
    }
}

// --- Notion API Response Structures ---

/// The paginated envelope shared by search, query, and block-children
/// responses. Items are kept as raw JSON so one malformed record never
/// poisons a whole page of results.
#[derive(Deserialize, Debug)]
struct PageResponse {
    results: Vec<Value>,
    next_cursor: Option<String>,
    has_more: bool,
}

// --- Configuration ---

/// Connection settings for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub version: String,
    pub base_url: String,
}

impl NotionConfig {
    /// Reads the configuration from the environment.
    ///
    /// `NOTION_TOKEN` is required; `NOTION_VERSION` falls back to
    /// [`DEFAULT_NOTION_VERSION`]. The base URL can be redirected with
    /// `NOTION_API_BASE_URL_OVERRIDE_FOR_TESTING` for mock-server tests.
    pub fn from_env() -> Result<Self, NotionError> {
        let token =
            env::var("NOTION_TOKEN").map_err(|_| NotionError::MissingEnvVar("NOTION_TOKEN".into()))?;
        let version =
            env::var("NOTION_VERSION").unwrap_or_else(|_| DEFAULT_NOTION_VERSION.to_string());
        Ok(Self {
            token,
            version,
            base_url: get_base_url(),
        })
    }
}

fn get_base_url() -> String {
    env::var("NOTION_API_BASE_URL_OVERRIDE_FOR_TESTING")
        .unwrap_or_else(|_| "https://api.notion.com".to_string())
}

// --- MealSource Implementation ---

/// The Notion-backed document source.
pub struct NotionSource {
    client: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
}

impl NotionSource {
    /// Creates a new `NotionSource` from connection settings.
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        Ok(Self {
            client: reqwest::Client::new(),
            headers: construct_headers(&config.token, &config.version)?,
            base_url: config.base_url,
        })
    }

    /// Runs one paginated POST endpoint to exhaustion, collecting the raw
    /// result items of every page.
    async fn post_paginated(&self, url: &str, body: &Value) -> Result<Vec<Value>, NotionError> {
        let mut all_results = Vec::new();
        let mut next_cursor: Option<String> = None;

        loop {
            let mut page_body = body.clone();
            page_body["start_cursor"] = json!(next_cursor);

            let response = self
                .client
                .post(url)
                .headers(self.headers.clone())
                .json(&page_body)
                .send()
                .await?;

            if !response.status().is_success() {
                let err_text = response.text().await.unwrap_or_default();
                return Err(NotionError::ApiError(err_text));
            }

            let mut page: PageResponse = response.json().await?;
            all_results.append(&mut page.results);

            if page.has_more {
                next_cursor = page.next_cursor;
            } else {
                break;
            }
        }

        Ok(all_results)
    }

    /// Same pagination loop for cursor-driven GET endpoints.
    async fn get_paginated(&self, url: &str) -> Result<Vec<Value>, NotionError> {
        let mut all_results = Vec::new();
        let mut next_cursor: Option<String> = None;

        loop {
            let mut request = self.client.get(url).headers(self.headers.clone());
            if let Some(cursor) = &next_cursor {
                request = request.query(&[("start_cursor", cursor)]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                let err_text = response.text().await.unwrap_or_default();
                return Err(NotionError::ApiError(err_text));
            }

            let mut page: PageResponse = response.json().await?;
            all_results.append(&mut page.results);

            if page.has_more {
                next_cursor = page.next_cursor;
            } else {
                break;
            }
        }

        Ok(all_results)
    }

    /// Searches the workspace, filtered to one object kind
    /// (`"page"` or `"database"`).
    async fn search(&self, query: &str, object: &str) -> Result<Vec<Value>, NotionError> {
        let url = format!("{}/v1/search", self.base_url);
        let body = json!({
            "query": query,
            "filter": { "property": "object", "value": object },
        });
        self.post_paginated(&url, &body).await
    }
}

#[async_trait]
impl MealSource for NotionSource {
    async fn list_containers(&self, keyword: &str) -> Result<Vec<ContainerRef>, SourceError> {
        let results = self.search(keyword, "database").await?;
        debug!(keyword, count = results.len(), "Notion database search");

        Ok(results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ContainerRef>(value) {
                Ok(container) => Some(container),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed database record");
                    None
                }
            })
            .collect())
    }

    async fn list_documents(
        &self,
        container_id: &str,
    ) -> Result<Vec<DocumentRecord>, SourceError> {
        let url = format!("{}/v1/databases/{container_id}/query", self.base_url);
        let results = self.post_paginated(&url, &json!({})).await?;
        debug!(container_id, count = results.len(), "Notion database query");

        Ok(parse_documents(results))
    }

    async fn search_documents(&self, query: &str) -> Result<Vec<DocumentRecord>, SourceError> {
        let results = self.search(query, "page").await?;
        debug!(query, count = results.len(), "Notion page search");

        Ok(parse_documents(results))
    }

    async fn document_body(&self, document_id: &str) -> Result<Vec<Block>, SourceError> {
        let url = format!("{}/v1/blocks/{document_id}/children", self.base_url);
        let results = self.get_paginated(&url).await?;

        Ok(results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Block>(value) {
                Ok(block) => Some(block),
                Err(e) => {
                    warn!(document_id, error = %e, "Skipping malformed block record");
                    None
                }
            })
            .collect())
    }
}

/// Parses raw result items into typed documents, skipping malformed records
/// so one bad page never aborts a batch.
fn parse_documents(results: Vec<Value>) -> Vec<DocumentRecord> {
    results
        .into_iter()
        .filter_map(|value| match DocumentRecord::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Skipping malformed page record");
                None
            }
        })
        .collect()
}

// --- Helper Functions ---

fn construct_headers(token: &str, version: &str) -> Result<HeaderMap, NotionError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| NotionError::ApiError(format!("Invalid token: {e}")))?,
    );
    headers.insert(
        "Notion-Version",
        HeaderValue::from_str(version)
            .map_err(|e| NotionError::ApiError(format!("Invalid version: {e}")))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
