use serde::Serialize;

use crate::finding::{FindingKind, ValidationFinding};
use crate::util::context_window;

/// Characters of context captured on each side of a flagged character.
pub const DEFAULT_CONTEXT_RADIUS: usize = 20;

const REPLACEMENT_CHARACTER_LABEL: &str = "\\uFFFD (Unicode replacement character)";

/// A disallowed character found in the raw feed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryCharacter {
    /// Character (code point) offset into the content.
    pub position: usize,
    pub character: char,
    /// Display form: a `\uXXXX` escape or a named label.
    pub display: String,
}

/// Where a flagged character sits, as reported in finding details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryLocation {
    pub position: usize,
    pub character: String,
    pub context: String,
}

/// Returns the display form if `c` must not appear in feed text.
///
/// Flags C0 control characters other than tab, newline and carriage return,
/// the noncharacters U+FFFE and U+FFFF (byte-swapped or bogus BOMs), and the
/// replacement character U+FFFD left behind by a lossy decoder.
fn classify(c: char) -> Option<String> {
    match c {
        '\t' | '\n' | '\r' => None,
        '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => Some(format!("\\u{:04x}", c as u32)),
        '\u{fffd}' => Some(REPLACEMENT_CHARACTER_LABEL.to_string()),
        _ => None,
    }
}

/// Scans every character of `content` and returns the disallowed ones in order.
pub fn find_binary_characters(content: &str) -> Vec<BinaryCharacter> {
    content
        .chars()
        .enumerate()
        .filter_map(|(position, character)| {
            classify(character).map(|display| BinaryCharacter {
                position,
                character,
                display,
            })
        })
        .collect()
}

/// Checks `content` for binary or non-printable characters using the default
/// context radius.
///
/// # Errors
///
/// Returns a [`FindingKind::BinaryContent`] finding whose details hold the
/// total `count` and a `locations` list with position, display form and
/// surrounding context for each flagged character.
pub fn check_for_binary_content(content: &str) -> Result<bool, ValidationFinding> {
    check_for_binary_content_with_radius(content, DEFAULT_CONTEXT_RADIUS)
}

/// [`check_for_binary_content`] with a configurable context radius.
pub fn check_for_binary_content_with_radius(
    content: &str,
    radius: usize,
) -> Result<bool, ValidationFinding> {
    let found = find_binary_characters(content);
    if found.is_empty() {
        return Ok(true);
    }

    let chars: Vec<char> = content.chars().collect();
    let locations: Vec<BinaryLocation> = found
        .into_iter()
        .map(|b| BinaryLocation {
            position: b.position,
            character: b.display,
            context: context_window(&chars, b.position, radius),
        })
        .collect();

    tracing::debug!(count = locations.len(), "Disallowed characters in feed content");

    Err(ValidationFinding::new(
        FindingKind::BinaryContent,
        "Binary or non-printable characters found in XML content",
    )
    .with_detail("count", locations.len())
    .with_detail("locations", &locations))
}
