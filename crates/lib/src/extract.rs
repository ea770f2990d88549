//! # Entity Extraction
//!
//! Turns one external document into at most one normalized [`Meal`], and
//! merges the results of multiple extraction passes into a title-unique set.
//!
//! Extraction is deliberately forgiving: a document without a resolvable
//! title yields nothing, an unrecognized property is ignored, and a
//! malformed document is reported as an [`ExtractError`] that the batch
//! fold logs and skips — one bad document never aborts the rest of a batch.

use crate::document::{join_runs, Block, DocumentRecord, PropertyValue, RichTextPayload};
use crate::types::Meal;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Property names probed, in order, to resolve a document's title.
const TITLE_KEYS: [&str; 3] = ["Name", "Title", "title"];

/// Errors that invalidate a single document during extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid value for property `{property}`: {reason}")]
    InvalidProperty { property: String, reason: String },
}

/// Extracts a [`Meal`] from one document.
///
/// Returns `Ok(None)` — a silent skip, not an error — when no title-typed
/// property with at least one text run resolves under the fixed,
/// case-sensitive probe order `Name`, `Title`, `title`.
///
/// This is a pure function of the document: extracting the same record
/// twice yields field-for-field identical meals.
pub fn meal_from_document(doc: &DocumentRecord) -> Result<Option<Meal>, ExtractError> {
    let Some(title) = resolve_title(doc) else {
        return Ok(None);
    };

    let mut meal = Meal::new(doc.id.clone(), title);
    meal.raw = doc.raw.clone();

    for (name, property) in &doc.properties {
        apply_property(&mut meal, name, property)?;
    }

    Ok(Some(meal))
}

/// Probes the fixed title-key priority list.
///
/// A property only counts if its declared type is the title kind and its
/// runs join to non-empty text.
fn resolve_title(doc: &DocumentRecord) -> Option<String> {
    for key in TITLE_KEYS {
        if let Some(PropertyValue::Title { title }) = doc.properties.get(key) {
            let text = join_runs(title);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Dispatches one property onto the meal under the recognized-name table.
///
/// Unrecognized names and types fall through untouched.
fn apply_property(meal: &mut Meal, name: &str, property: &PropertyValue) -> Result<(), ExtractError> {
    let key = name.to_lowercase();
    match property {
        PropertyValue::RichText { rich_text }
            if matches!(key.as_str(), "description" | "notes") =>
        {
            meal.description = Some(join_runs(rich_text));
        }
        PropertyValue::Select { select }
            if matches!(key.as_str(), "cuisine" | "cuisine_type" | "type") =>
        {
            if let Some(choice) = select {
                meal.cuisine_type = Some(choice.name.clone());
            }
        }
        PropertyValue::Number { number } => match key.as_str() {
            "prep_time" | "prep" => meal.prep_time = minutes(name, *number)?,
            "cook_time" | "cook" => meal.cook_time = minutes(name, *number)?,
            "rating" | "score" => meal.rating = number.map(|n| n as i32),
            _ => {}
        },
        PropertyValue::MultiSelect { multi_select }
            if matches!(key.as_str(), "tags" | "categories") =>
        {
            meal.tags = multi_select.iter().map(|tag| tag.name.clone()).collect();
        }
        PropertyValue::Date { date } if matches!(key.as_str(), "last_made" | "last_cooked") => {
            if let Some(value) = date {
                meal.last_made = parse_timestamp(&value.start);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Converts a numeric property into whole minutes.
///
/// Durations must be finite and non-negative; anything else invalidates the
/// document.
fn minutes(property: &str, number: Option<f64>) -> Result<Option<u32>, ExtractError> {
    match number {
        None => Ok(None),
        Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n as u32)),
        Some(n) => Err(ExtractError::InvalidProperty {
            property: property.to_string(),
            reason: format!("expected a non-negative number of minutes, got {n}"),
        }),
    }
}

/// Best-effort timestamp parsing for date property starts.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (taken as
/// midnight UTC); anything else resolves to `None` rather than failing the
/// document.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = value.parse::<DateTime<Utc>>() {
        return Some(timestamp);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
}

// --- Block Flattening ---

/// Flattens a document body to plain text, one line per block.
///
/// Only the top-level blocks are visited; nesting below the first level is
/// not descended into. Blocks whose text is empty or whitespace-only are
/// omitted. Numbered items always render with the literal index `1.` — the
/// source format does not carry a running counter.
pub fn flatten_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block) -> Option<String> {
    fn text(payload: &RichTextPayload) -> Option<String> {
        let joined = join_runs(&payload.rich_text);
        (!joined.trim().is_empty()).then_some(joined)
    }

    match block {
        Block::Paragraph { paragraph } => text(paragraph),
        Block::Heading1 { heading_1 } => text(heading_1).map(|t| format!("# {t}")),
        Block::Heading2 { heading_2 } => text(heading_2).map(|t| format!("## {t}")),
        Block::Heading3 { heading_3 } => text(heading_3).map(|t| format!("### {t}")),
        Block::BulletedListItem { bulleted_list_item } => {
            text(bulleted_list_item).map(|t| format!("- {t}"))
        }
        Block::NumberedListItem { numbered_list_item } => {
            text(numbered_list_item).map(|t| format!("1. {t}"))
        }
        Block::ToDo { to_do } => {
            let joined = join_runs(&to_do.rich_text);
            if joined.trim().is_empty() {
                return None;
            }
            let mark = if to_do.checked { "x" } else { " " };
            Some(format!("[{mark}] {joined}"))
        }
        Block::Toggle { toggle } => {
            // Opens a collapsible section; the marker is intentionally never
            // closed, matching the flat one-line-per-block output.
            text(toggle).map(|t| format!("<details><summary>{t}</summary>"))
        }
        Block::Quote { quote } => text(quote).map(|t| format!("> {t}")),
        Block::Callout { callout } => {
            let joined = join_runs(&callout.rich_text);
            if joined.trim().is_empty() {
                return None;
            }
            let icon = callout
                .icon
                .as_ref()
                .and_then(|icon| icon.emoji.clone())
                .unwrap_or_else(|| "💡".to_string());
            Some(format!("{icon} {joined}"))
        }
        Block::Other => None,
    }
}

// --- Batch Fold & Deduplication ---

/// Runs the extractor over a batch of documents, partitioning successes
/// from skips.
///
/// Titleless documents and per-document failures are logged and dropped;
/// the remaining documents are always processed.
pub fn extract_meals<'a, I>(documents: I) -> Vec<Meal>
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let mut meals = Vec::new();
    for doc in documents {
        match meal_from_document(doc) {
            Ok(Some(meal)) => meals.push(meal),
            Ok(None) => {
                debug!(document_id = %doc.id, "document has no resolvable title, skipping")
            }
            Err(error) => {
                warn!(document_id = %doc.id, %error, "failed to extract meal, skipping document")
            }
        }
    }
    meals
}

/// Merges extraction passes into a single title-unique set.
///
/// The first occurrence of each case-insensitively distinct title wins;
/// later occurrences are dropped regardless of other field differences, so
/// callers must feed their preferred pass first.
pub fn collect_unique(meals: impl IntoIterator<Item = Meal>) -> Vec<Meal> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for meal in meals {
        if seen.insert(meal.title.to_lowercase()) {
            unique.push(meal);
        }
    }
    unique
}
