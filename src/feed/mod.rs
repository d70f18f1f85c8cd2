//! Feed checks run against the file produced by the site build.
//!
//! Three independent checks make up a validation run:
//!
//! - **Structure**: the feed parses as XML and carries the RSS elements a
//!   reader needs (`channel` with `title`, `link`, `description`, and items
//!   with `title` and `link`)
//! - **CDATA balance**: open and close markers occur equally often in the raw text
//! - **Binary content**: no control characters, BOM noncharacters or U+FFFD
//!
//! # Architecture
//!
//! - [`document`] - Minimal element tree built with `quick-xml`
//! - [`structure`] - Required-element checks over the tree
//! - [`cdata`] - Marker counting over the raw text
//! - [`binary`] - Character scan over the raw text
//!
//! The structural check reads and parses the file itself; the two textual
//! checks take the raw content as a string so the caller reads it once.
//!
//! # Example
//!
//! ```no_run
//! use feedgate::feed::{check_cdata_sections, check_for_binary_content, check_required_elements};
//! use std::path::Path;
//!
//! let path = Path::new("_site/index.xml");
//! if check_required_elements(path)? {
//!     let content = std::fs::read_to_string(path).unwrap();
//!     check_cdata_sections(&content)?;
//!     check_for_binary_content(&content)?;
//! }
//! # Ok::<(), feedgate::finding::ValidationFinding>(())
//! ```

pub mod binary;
pub mod cdata;
pub mod document;
pub mod structure;

pub use binary::{
    check_for_binary_content, check_for_binary_content_with_radius, find_binary_characters,
    BinaryCharacter, BinaryLocation, DEFAULT_CONTEXT_RADIUS,
};
pub use cdata::check_cdata_sections;
pub use document::{DocumentError, Element, FeedDocument};
pub use structure::{check_document, check_required_elements, inspect_structure, StructureOutcome};
