use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{LocalName, ResolveResult};
use quick_xml::NsReader;
use std::path::Path;
use thiserror::Error;

/// SEC-003: Maximum allowed element nesting depth.
/// RSS feeds are shallow; anything deeper is a malformed or hostile document.
const MAX_DEPTH: usize = 256;

/// Errors that make a feed file unusable as an XML document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O error.
    #[error("Failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not UTF-8 encoded.
    #[error("Feed file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// quick-xml rejected the input (mismatched tags, bad entity, syntax).
    #[error("XML parse error at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    /// SEC-003: Nesting depth exceeds safety limit.
    #[error("Element nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// An element or attribute name uses a prefix with no `xmlns:` binding in scope.
    #[error("Undeclared namespace prefix `{0}` at byte {1}")]
    UnboundPrefix(String, u64),

    #[error("No root element found")]
    NoRoot,

    #[error("Element <{0}> is not closed at end of document")]
    Unclosed(String),

    #[error("Unexpected element after the root element at byte {0}")]
    TrailingElement(u64),

    #[error("Unexpected text outside the root element at byte {0}")]
    TextOutsideRoot(u64),
}

/// One XML element: its expanded name, its concatenated character data
/// (text and CDATA), and its child elements in document order.
///
/// Names in a namespace are stored in Clark notation, `{uri}local`; names in
/// no namespace are stored bare. So `<channel>` under `xmlns="urn:x"` is
/// `{urn:x}channel`, and `<atom:link>` is `{http://www.w3.org/2005/Atom}link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Builds an element from a start tag, checking its attributes on the way.
    ///
    /// Attributes are not kept, but they must still be well-formed: quoted
    /// values, no duplicates, valid entity references and declared prefixes.
    fn from_start(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<Self, DocumentError> {
        let position = reader.buffer_position();
        let (namespace, local) = reader.resolve_element(e.name());
        let name = expanded_name(namespace, local, position)?;

        for attr_result in e.attributes().with_checks(true) {
            let attr = attr_result.map_err(|source| DocumentError::Xml {
                position,
                source: source.into(),
            })?;
            let (namespace, local) = reader.resolve_attribute(attr.key);
            expanded_name(namespace, local, position)?;
            attr.unescape_value()
                .map_err(|source| DocumentError::Xml { position, source })?;
        }

        Ok(Self {
            name,
            text: String::new(),
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed character data directly inside this element.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with exactly this expanded name.
    ///
    /// `link` matches only an unprefixed `<link>` outside any default
    /// namespace; `atom:link` does not match it.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with exactly this expanded name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// A parsed feed file.
///
/// Only element structure and text are kept; attributes, comments and
/// processing instructions are discarded after parsing.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    root: Element,
}

impl FeedDocument {
    /// Reads and parses the feed file at `path`.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes)?;
        Self::parse(&content)
    }

    /// Parses feed XML into an element tree.
    ///
    /// The document must be well-formed: exactly one root element, matching
    /// end tags, well-formed attributes, only the five predefined entities,
    /// declared namespace prefixes, and no element or text after the root
    /// closes.
    ///
    /// # Security
    ///
    /// quick-xml (0.37) never expands `<!ENTITY>` declarations. References to
    /// custom entities fail in `unescape()` and surface as [`DocumentError::Xml`].
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let mut reader = NsReader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|source| DocumentError::Xml {
                position: reader.error_position(),
                source,
            })?;

            match event {
                Event::Start(e) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(DocumentError::TrailingElement(reader.buffer_position()));
                    }
                    // SEC-003: Reject excessively nested documents
                    if stack.len() >= MAX_DEPTH {
                        return Err(DocumentError::MaxDepthExceeded(MAX_DEPTH));
                    }
                    stack.push(Element::from_start(&reader, &e)?);
                }
                Event::Empty(e) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(DocumentError::TrailingElement(reader.buffer_position()));
                    }
                    let element = Element::from_start(&reader, &e)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    // quick-xml verifies end names, so the top of the stack is
                    // the element being closed
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|source| DocumentError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(DocumentError::TextOutsideRoot(reader.buffer_position()))
                        }
                    }
                }
                Event::CData(c) => match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&String::from_utf8_lossy(&c)),
                    None => return Err(DocumentError::TextOutsideRoot(reader.buffer_position())),
                },
                Event::Eof => break,
                // Declarations, comments, processing instructions, DOCTYPE
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(DocumentError::Unclosed(open.name));
        }
        root.map(|root| FeedDocument { root })
            .ok_or(DocumentError::NoRoot)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn expanded_name(
    namespace: ResolveResult<'_>,
    local: LocalName<'_>,
    position: u64,
) -> Result<String, DocumentError> {
    let local = String::from_utf8_lossy(local.as_ref());
    match namespace {
        ResolveResult::Bound(ns) => Ok(format!(
            "{{{}}}{}",
            String::from_utf8_lossy(ns.as_ref()),
            local
        )),
        ResolveResult::Unbound => Ok(local.into_owned()),
        ResolveResult::Unknown(prefix) => Err(DocumentError::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
            position,
        )),
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
