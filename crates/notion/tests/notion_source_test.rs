//! # Notion Source Integration Tests
//!
//! Exercises the transport against a mock HTTP server. Tests are serial
//! because the base-URL override travels through the environment.

use anyhow::Result;
use httpmock::{Method, MockServer};
use mealworm::extract::{extract_meals, flatten_blocks};
use mealworm::source::MealSource;
use mealworm_notion::{NotionConfig, NotionSource};
use serde_json::json;
use serial_test::serial;
use std::env;

fn source_for(server: &MockServer) -> Result<NotionSource> {
    env::set_var("NOTION_API_BASE_URL_OVERRIDE_FOR_TESTING", server.base_url());
    env::set_var("NOTION_TOKEN", "test_token");
    let source = NotionSource::new(NotionConfig::from_env()?)?;
    env::remove_var("NOTION_API_BASE_URL_OVERRIDE_FOR_TESTING");
    Ok(source)
}

#[tokio::test]
#[serial]
async fn test_list_containers_filters_databases() -> Result<()> {
    let server = MockServer::start();

    let search_mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/v1/search")
            .body_contains(r#""query":"meal""#)
            .body_contains(r#""value":"database""#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "results": [
                    { "object": "database", "id": "db-1" },
                    { "object": "database", "id": "db-2" }
                ],
                "has_more": false,
                "next_cursor": null
            }));
    });

    let source = source_for(&server)?;
    let containers = source.list_containers("meal").await?;

    let ids: Vec<&str> = containers.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["db-1", "db-2"]);
    search_mock.assert();

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_list_documents_paginates_and_extracts() -> Result<()> {
    let server = MockServer::start();

    // First page: cursor is null, one result, more to come.
    let first_page_mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/v1/databases/db-1/query")
            .body_contains("null");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "results": [
                    {
                        "object": "page",
                        "id": "page-1",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Beef Tacos" }] },
                            "Cuisine": { "type": "select", "select": { "name": "Mexican" } }
                        }
                    }
                ],
                "has_more": true,
                "next_cursor": "cursor-2"
            }));
    });

    // Second page: the cursor travels back, two results, one titleless.
    let second_page_mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/v1/databases/db-1/query")
            .body_contains("cursor-2");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "results": [
                    {
                        "object": "page",
                        "id": "page-2",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Lentil Soup" }] }
                        }
                    },
                    {
                        "object": "page",
                        "id": "page-3",
                        "properties": {
                            "Status": { "type": "rich_text", "rich_text": [{ "plain_text": "untitled" }] }
                        }
                    }
                ],
                "has_more": false,
                "next_cursor": null
            }));
    });

    let source = source_for(&server)?;
    let documents = source.list_documents("db-1").await?;
    assert_eq!(documents.len(), 3);

    // The titleless page is silently skipped by extraction, not an error.
    let meals = extract_meals(&documents);
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0].title, "Beef Tacos");
    assert_eq!(meals[0].cuisine_type.as_deref(), Some("Mexican"));
    assert_eq!(meals[1].title, "Lentil Soup");

    first_page_mock.assert();
    second_page_mock.assert();

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_search_documents_uses_page_filter() -> Result<()> {
    let server = MockServer::start();

    let search_mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/v1/search")
            .body_contains(r#""query":"meal recipe""#)
            .body_contains(r#""value":"page""#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "results": [
                    {
                        "object": "page",
                        "id": "page-9",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Pad Thai" }] }
                        }
                    }
                ],
                "has_more": false,
                "next_cursor": null
            }));
    });

    let source = source_for(&server)?;
    let documents = source.search_documents("meal recipe").await?;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, "page-9");
    search_mock.assert();

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_document_body_returns_typed_blocks() -> Result<()> {
    let server = MockServer::start();

    let children_mock = server.mock(|when, then| {
        when.method(Method::GET).path("/v1/blocks/page-1/children");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "results": [
                    { "type": "heading_2", "heading_2": { "rich_text": [{ "plain_text": "Steps" }] } },
                    { "type": "numbered_list_item", "numbered_list_item": { "rich_text": [{ "plain_text": "Boil water" }] } },
                    { "type": "numbered_list_item", "numbered_list_item": { "rich_text": [{ "plain_text": "Add pasta" }] } },
                    { "type": "divider", "divider": {} }
                ],
                "has_more": false,
                "next_cursor": null
            }));
    });

    let source = source_for(&server)?;
    let blocks = source.document_body("page-1").await?;
    assert_eq!(blocks.len(), 4);

    assert_eq!(
        flatten_blocks(&blocks),
        "## Steps\n1. Boil water\n1. Add pasta"
    );
    children_mock.assert();

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_api_error_is_surfaced() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(Method::POST).path("/v1/search");
        then.status(500).body("upstream exploded");
    });

    let source = source_for(&server)?;
    let result = source.list_containers("meal").await;
    assert!(result.is_err(), "a failing API call must error the fetch");

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_missing_token_is_rejected() {
    env::remove_var("NOTION_TOKEN");
    assert!(NotionConfig::from_env().is_err());
}
