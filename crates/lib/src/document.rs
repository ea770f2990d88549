//! # Workspace Document Model
//!
//! The semi-structured shape of an external document: an unordered map of
//! named, typed property values plus an ordered tree of typed content
//! blocks. Property and block kinds are modeled as internally tagged unions
//! so that dispatch in the extractor is an exhaustive `match` instead of
//! string probing, with a catch-all variant for kinds this system does not
//! recognize.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One rich-text run.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlainText {
    pub plain_text: String,
}

/// Concatenates the plain text of a sequence of runs.
pub fn join_runs(runs: &[PlainText]) -> String {
    runs.iter()
        .map(|run| run.plain_text.as_str())
        .collect::<Vec<_>>()
        .join("")
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

/// A single selected option of a select or multi-select property.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SelectValue {
    pub name: String,
}

/// A named property's typed value.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        title: Vec<PlainText>,
    },
    RichText {
        rich_text: Vec<PlainText>,
    },
    Select {
        select: Option<SelectValue>,
    },
    MultiSelect {
        multi_select: Vec<SelectValue>,
    },
    Number {
        number: Option<f64>,
    },
    Date {
        date: Option<DateValue>,
    },
    #[serde(other)]
    Other,
}

/// One external document record: an identifier plus its typed properties.
///
/// Properties are kept in a `BTreeMap` so iteration order — and therefore
/// extraction — is deterministic for a given document.
#[derive(Deserialize, Debug, Clone)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    /// The unparsed source record, retained for traceability.
    #[serde(skip)]
    pub raw: Value,
}

impl DocumentRecord {
    /// Parses a raw API record, keeping the original JSON alongside the
    /// typed view.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut record: DocumentRecord = serde_json::from_value(value.clone())?;
        record.raw = value;
        Ok(record)
    }
}

// --- Content Blocks ---

/// The rich-text payload shared by most block kinds.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RichTextPayload {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ToDoPayload {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IconValue {
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CalloutPayload {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
    #[serde(default)]
    pub icon: Option<IconValue>,
}

/// One typed unit of a document's body content.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        paragraph: RichTextPayload,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        heading_1: RichTextPayload,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        heading_2: RichTextPayload,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        heading_3: RichTextPayload,
    },
    BulletedListItem {
        bulleted_list_item: RichTextPayload,
    },
    NumberedListItem {
        numbered_list_item: RichTextPayload,
    },
    ToDo {
        to_do: ToDoPayload,
    },
    Toggle {
        toggle: RichTextPayload,
    },
    Quote {
        quote: RichTextPayload,
    },
    Callout {
        callout: CalloutPayload,
    },
    #[serde(other)]
    Other,
}
