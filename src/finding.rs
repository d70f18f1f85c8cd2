//! Structured validation failures raised by the feed checkers.
//!
//! A [`ValidationFinding`] is the value form of "this feed is invalid": a
//! kind, a human-readable message, and an ordered mapping of diagnostic
//! details (counts, positions, offending characters, surrounding context).
//! Findings are produced by the checkers in [`crate::feed`] and caught once,
//! by the orchestrator in [`crate::validator`].
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Ordered diagnostic details attached to a finding.
pub type Details = BTreeMap<String, Value>;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// `channel`, one of its required fields, or every `item` is absent.
    MissingElement,
    /// An `item` lacks `title` or `link`.
    MissingItemElement,
    /// `<![CDATA[` and `]]>` occur a different number of times.
    CdataMismatch,
    /// Control characters, BOM code points or U+FFFD found in the raw text.
    BinaryContent,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::MissingElement => "missing_element",
            FindingKind::MissingItemElement => "missing_item_element",
            FindingKind::CdataMismatch => "cdata_mismatch",
            FindingKind::BinaryContent => "binary_content",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A failed validation check.
///
/// Displays as `message` when there are no details, otherwise as
/// `message: {details}` with the details rendered as a JSON object.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}{}", format_details(.details))]
pub struct ValidationFinding {
    pub kind: FindingKind,
    pub message: String,
    pub details: Details,
}

impl ValidationFinding {
    pub fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Details::new(),
        }
    }

    /// Attach a detail entry. Values that fail to serialize are recorded as `null`.
    pub fn with_detail(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.details.insert(key.to_string(), value);
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

fn format_details(details: &Details) -> String {
    if details.is_empty() {
        return String::new();
    }
    match serde_json::to_string(details) {
        Ok(rendered) => format!(": {}", rendered),
        Err(_) => String::new(),
    }
}
