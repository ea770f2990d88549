//! Shared test doubles for the `mealworm` workspace: a scriptable AI
//! provider, an in-memory document source, and document JSON builders.

use async_trait::async_trait;
use mealworm::document::{Block, DocumentRecord};
use mealworm::errors::PromptError;
use mealworm::providers::ai::AiProvider;
use mealworm::source::{ContainerRef, MealSource, SourceError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Mock Meal Source ---

/// An in-memory document source.
///
/// Unscripted keywords, containers, queries, and bodies resolve to empty
/// results, matching the pipeline's empty-but-valid semantics; a source
/// built with [`MockMealSource::failing`] errors on every call instead.
#[derive(Default)]
pub struct MockMealSource {
    containers: HashMap<String, Vec<String>>,
    documents: HashMap<String, Vec<DocumentRecord>>,
    search_results: HashMap<String, Vec<DocumentRecord>>,
    bodies: HashMap<String, Vec<Block>>,
    failure: Option<String>,
}

impl MockMealSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose every call fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Registers a container id surfaced for a keyword probe.
    pub fn with_container(mut self, keyword: &str, container_id: &str) -> Self {
        self.containers
            .entry(keyword.to_string())
            .or_default()
            .push(container_id.to_string());
        self
    }

    /// Registers the documents listed for a container.
    pub fn with_documents(mut self, container_id: &str, documents: Vec<DocumentRecord>) -> Self {
        self.documents.insert(container_id.to_string(), documents);
        self
    }

    /// Registers the documents returned for a search query.
    pub fn with_search(mut self, query: &str, documents: Vec<DocumentRecord>) -> Self {
        self.search_results.insert(query.to_string(), documents);
        self
    }

    /// Registers the body blocks of a document.
    pub fn with_body(mut self, document_id: &str, blocks: Vec<Block>) -> Self {
        self.bodies.insert(document_id.to_string(), blocks);
        self
    }

    fn check_failure(&self) -> Result<(), SourceError> {
        match &self.failure {
            Some(message) => Err(SourceError::Fetch(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MealSource for MockMealSource {
    async fn list_containers(&self, keyword: &str) -> Result<Vec<ContainerRef>, SourceError> {
        self.check_failure()?;
        Ok(self
            .containers
            .get(keyword)
            .map(|ids| {
                ids.iter()
                    .map(|id| ContainerRef { id: id.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_documents(
        &self,
        container_id: &str,
    ) -> Result<Vec<DocumentRecord>, SourceError> {
        self.check_failure()?;
        Ok(self.documents.get(container_id).cloned().unwrap_or_default())
    }

    async fn search_documents(&self, query: &str) -> Result<Vec<DocumentRecord>, SourceError> {
        self.check_failure()?;
        Ok(self
            .search_results
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn document_body(&self, document_id: &str) -> Result<Vec<Block>, SourceError> {
        self.check_failure()?;
        Ok(self.bodies.get(document_id).cloned().unwrap_or_default())
    }
}

// --- Document Builders ---

/// A minimal page record: an id and a title property.
pub fn meal_page(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "Name": {
                "type": "title",
                "title": [{ "plain_text": title }]
            }
        }
    })
}

/// Parses builder JSON into a typed document record.
pub fn document(value: Value) -> DocumentRecord {
    DocumentRecord::from_value(value).expect("valid document JSON")
}

/// Parses builder JSON into a typed content block.
pub fn block(value: Value) -> Block {
    serde_json::from_value(value).expect("valid block JSON")
}
