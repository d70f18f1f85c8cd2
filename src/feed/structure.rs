use std::path::Path;

use crate::feed::document::{DocumentError, Element, FeedDocument};
use crate::finding::{FindingKind, ValidationFinding};

/// Elements every RSS channel must carry.
const REQUIRED_CHANNEL_ELEMENTS: [&str; 3] = ["title", "link", "description"];

/// Elements every RSS item must carry.
const REQUIRED_ITEM_ELEMENTS: [&str; 2] = ["title", "link"];

/// Result of inspecting the feed file's structure.
#[derive(Debug)]
pub enum StructureOutcome {
    /// Channel, channel fields and at least one complete item are present.
    Valid,
    /// No file at the feed path.
    NotFound,
    /// The file could not be read or is not well-formed XML.
    Unparseable(DocumentError),
    /// The XML is well-formed but an element check failed.
    Invalid(ValidationFinding),
}

/// Reads, parses and checks the feed file at `path`, logging the outcome.
pub fn inspect_structure(path: &Path) -> StructureOutcome {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "RSS feed not found");
        return StructureOutcome::NotFound;
    }

    let document = match FeedDocument::read(path) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "XML parsing error");
            return StructureOutcome::Unparseable(e);
        }
    };

    match check_document(&document) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "RSS feed validation successful!");
            StructureOutcome::Valid
        }
        Err(finding) => StructureOutcome::Invalid(finding),
    }
}

/// Checks the feed file at `path` for the required RSS elements.
///
/// # Returns
///
/// - `Ok(true)` when the channel, its required fields and at least one
///   complete item are present
/// - `Ok(false)` when the file does not exist or is not well-formed XML;
///   these are soft failures, logged here and left to the caller's policy
///
/// # Errors
///
/// Returns a [`ValidationFinding`] of kind [`FindingKind::MissingElement`] or
/// [`FindingKind::MissingItemElement`] describing the first structural problem.
pub fn check_required_elements(path: &Path) -> Result<bool, ValidationFinding> {
    match inspect_structure(path) {
        StructureOutcome::Valid => Ok(true),
        StructureOutcome::NotFound | StructureOutcome::Unparseable(_) => Ok(false),
        StructureOutcome::Invalid(finding) => Err(finding),
    }
}

/// Runs the element checks over an already-parsed document.
///
/// Checks run in order and stop at the first failure: channel presence,
/// channel fields (all missing names reported together), item presence,
/// then per-item fields (first offending item reported).
pub fn check_document(document: &FeedDocument) -> Result<(), ValidationFinding> {
    let root = document.root();
    let channel = root.child("channel").ok_or_else(|| {
        ValidationFinding::new(
            FindingKind::MissingElement,
            "No channel element found in RSS feed",
        )
        .with_detail("element", "channel")
        .with_detail("root", root.name())
    })?;

    let channels = root.children_named("channel").count();
    if channels > 1 {
        tracing::warn!(count = channels, "Feed has more than one channel, checking the first");
    }

    let missing = missing_children(channel, &REQUIRED_CHANNEL_ELEMENTS);
    if !missing.is_empty() {
        return Err(ValidationFinding::new(
            FindingKind::MissingElement,
            "Required elements missing from RSS feed",
        )
        .with_detail("missing_elements", missing));
    }
    for name in REQUIRED_CHANNEL_ELEMENTS {
        let count = channel.children_named(name).count();
        if count > 1 {
            tracing::warn!(element = name, count, "Channel element appears more than once");
        }
    }

    let items: Vec<&Element> = channel.children_named("item").collect();
    if items.is_empty() {
        return Err(ValidationFinding::new(
            FindingKind::MissingElement,
            "Required items missing from RSS feed",
        )
        .with_detail("item_count", 0));
    }

    for (index, item) in items.iter().enumerate() {
        let missing = missing_children(item, &REQUIRED_ITEM_ELEMENTS);
        if !missing.is_empty() {
            let position = index + 1;
            return Err(ValidationFinding::new(
                FindingKind::MissingItemElement,
                "Required item-elements missing from RSS feed",
            )
            .with_detail("item_index", position)
            .with_detail("item", item_label(item, position))
            .with_detail("missing_elements", missing));
        }
    }

    tracing::debug!(items = items.len(), "All items carry title and link");
    Ok(())
}

fn missing_children<'a>(element: &Element, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|name| element.child(name).is_none())
        .collect()
}

/// Human-readable name for an item: its title, else its link, else its position.
fn item_label(item: &Element, position: usize) -> String {
    ["title", "link"]
        .iter()
        .filter_map(|name| item.child(name))
        .map(Element::text)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("item #{}", position))
}
