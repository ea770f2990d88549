//! # Document Source Seam
//!
//! The narrow interface the fetch stage consumes to discover and read
//! workspace documents. Transports (e.g. the Notion implementation in
//! `mealworm-notion`) implement [`MealSource`] and map their specific
//! failures into the standardized [`SourceError`] variants, so the pipeline
//! can treat all document sources uniformly.

use crate::document::{Block, DocumentRecord};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A generic error type for document-source implementations.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to fetch from the document source: {0}")]
    Fetch(String),
    #[error("The document source returned an error: {0}")]
    Api(String),
    #[error("Failed to parse a document-source response: {0}")]
    Parse(String),
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// A reference to a container (database) of documents.
#[derive(Deserialize, Debug, Clone)]
pub struct ContainerRef {
    pub id: String,
}

/// The document-source contract consumed by the fetch stage.
///
/// All calls are request/response; pagination, authentication, and retries
/// are the transport's business.
#[async_trait]
pub trait MealSource: Send + Sync {
    /// Lists document containers matching a keyword.
    async fn list_containers(&self, keyword: &str) -> Result<Vec<ContainerRef>, SourceError>;

    /// Enumerates every document in a container.
    async fn list_documents(&self, container_id: &str)
        -> Result<Vec<DocumentRecord>, SourceError>;

    /// Searches individual documents across the workspace.
    async fn search_documents(&self, query: &str) -> Result<Vec<DocumentRecord>, SourceError>;

    /// Fetches the ordered top-level content blocks of a document's body.
    async fn document_body(&self, document_id: &str) -> Result<Vec<Block>, SourceError>;
}
