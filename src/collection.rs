//! Collection payloads and their construction from CSV rows.
//!
//! A row maps to exactly one creation payload. The `type` column picks the
//! variant; anything other than `smart` is a custom collection. Construction
//! is pure and deterministic, so a bad `rules_json` fails here, before any
//! network traffic.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::csv_input::RowRecord;
use crate::error::TransformError;

/// The two collection flavors the Admin API knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionType {
    Custom,
    Smart,
}

impl CollectionType {
    /// Resolve the variant from a raw `type` cell. Defaults to `Custom`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("smart") => CollectionType::Smart,
            _ => CollectionType::Custom,
        }
    }

    /// API path for the create call, relative to the versioned base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CollectionType::Custom => "custom_collections.json",
            CollectionType::Smart => "smart_collections.json",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionType::Custom => write!(f, "custom"),
            CollectionType::Smart => write!(f, "smart"),
        }
    }
}

/// Nested image object; the API wants `{"image": {"src": ...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct Image {
    pub src: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomCollection {
    pub title: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartCollection {
    pub title: String,
    pub published: bool,
    pub rules: Value,
    pub disjunctive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

/// Request body for a collection create call.
///
/// External tagging matches the wire format: the JSON body is
/// `{"custom_collection": {...}}` or `{"smart_collection": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub enum CollectionPayload {
    #[serde(rename = "custom_collection")]
    Custom(CustomCollection),
    #[serde(rename = "smart_collection")]
    Smart(SmartCollection),
}

impl CollectionPayload {
    pub fn kind(&self) -> CollectionType {
        match self {
            CollectionPayload::Custom(_) => CollectionType::Custom,
            CollectionPayload::Smart(_) => CollectionType::Smart,
        }
    }
}

/// Build the creation payload for one row.
///
/// The caller guarantees a non-blank title; optional fields are only emitted
/// when the source cell holds a non-empty value.
pub fn build_payload(row: &RowRecord) -> Result<CollectionPayload, TransformError> {
    let title = row.title.trim().to_string();
    let published = parse_bool(row.published.as_deref(), true);
    let handle = trimmed(row.handle.as_deref());
    let body_html = row.body_html.clone().filter(|v| !v.is_empty());
    let image = trimmed(row.image_src.as_deref()).map(|src| Image { src });

    match CollectionType::from_raw(row.collection_type.as_deref()) {
        CollectionType::Custom => Ok(CollectionPayload::Custom(CustomCollection {
            title,
            published,
            handle,
            body_html,
            image,
        })),
        CollectionType::Smart => {
            let raw = row
                .rules_json
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if raw.is_empty() {
                return Err(TransformError::MissingRules { title });
            }
            let rules: Value = serde_json::from_str(raw).map_err(|e| {
                TransformError::InvalidRules {
                    title: title.clone(),
                    message: e.to_string(),
                }
            })?;

            Ok(CollectionPayload::Smart(SmartCollection {
                title,
                published,
                rules,
                disjunctive: parse_bool(row.disjunctive.as_deref(), false),
                handle,
                body_html,
                image,
            }))
        }
    }
}

/// Truthy strings are `true`, `1` and `yes`; blank cells take the default.
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(raw) => {
            let v = raw.trim().to_lowercase();
            if v.is_empty() {
                default
            } else {
                matches!(v.as_str(), "true" | "1" | "yes")
            }
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
