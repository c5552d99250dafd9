//! Run-text extraction from the WordprocessingML body part.
//!
//! The body part is scanned once with a namespace-resolving reader. Every
//! element whose expanded name is `{WORDPROCESSINGML_NS}t` is a text run;
//! the character data it holds before its first child element is appended
//! to the output. The scan also enforces well-formedness, so a truncated or
//! otherwise broken part is an error rather than a short result.

use crate::container::DocxContainer;
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, trace};

/// Name of the archive entry holding the document body.
pub const BODY_PART: &str = "word/document.xml";

/// Namespace URI of the WordprocessingML main vocabulary.
pub const WORDPROCESSINGML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Local name of the text run element.
pub const TEXT_RUN_ELEMENT: &str = "t";

/// Options controlling text extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Archive entry to read the body from.
    pub body_part: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            body_part: BODY_PART.to_string(),
        }
    }
}

impl ExtractOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the body from a different archive entry.
    pub fn with_body_part(mut self, name: impl Into<String>) -> Self {
        self.body_part = name.into();
        self
    }
}

/// Extracts the concatenated run text of a `.docx` document.
///
/// A `TextExtractor` holds no document state; every call opens, reads and
/// releases its own archive, so one extractor can be shared freely.
///
/// # Example
///
/// ```no_run
/// use docxtext::TextExtractor;
///
/// let text = TextExtractor::new().extract("report.docx")?;
/// println!("{}", text);
/// # Ok::<(), docxtext::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    options: ExtractOptions,
}

impl TextExtractor {
    /// Create an extractor reading [`BODY_PART`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options this extractor was built with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract text from the document at `path`.
    ///
    /// The archive is closed before this returns, on success and on error.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<String> {
        let mut container = DocxContainer::open(path)?;
        self.extract_container(&mut container)
    }

    /// Extract text from an in-memory `.docx` archive.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<String> {
        self.extract_reader(std::io::Cursor::new(data))
    }

    /// Extract text from any seekable reader over a `.docx` archive.
    pub fn extract_reader<R: Read + Seek>(&self, reader: R) -> Result<String> {
        let mut container = DocxContainer::from_reader(reader)?;
        self.extract_container(&mut container)
    }

    /// Extract text from an already-decoded body part.
    pub fn extract_xml(&self, xml: &str) -> Result<String> {
        collect_run_text(xml)
    }

    fn extract_container<R: Read + Seek>(
        &self,
        container: &mut DocxContainer<R>,
    ) -> Result<String> {
        let xml = container.read_xml(&self.options.body_part)?;
        collect_run_text(&xml)
    }
}

/// Whether an open element is a text run that is still collecting its
/// leading character data.
struct Frame {
    collecting: bool,
}

fn malformed(reader: &NsReader<&[u8]>, msg: impl std::fmt::Display) -> Error {
    Error::MalformedContent(format!("{} at byte {}", msg, reader.buffer_position()))
}

/// Whether `name` matches the XML `Name` production with at most one
/// colon, separating two non-empty parts.
fn is_qualified_name(name: &[u8]) -> bool {
    let Ok(name) = std::str::from_utf8(name) else {
        return false;
    };
    let mut parts = name.split(':');
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
    };

    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), None, _) => valid_part(local),
        (Some(prefix), Some(local), None) => valid_part(prefix) && valid_part(local),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Namespace declarations and the reserved `xml` prefix resolve without a
/// declaration in scope.
fn is_reserved_attribute(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:") || key.starts_with(b"xml:")
}

/// Check the element's attributes and classify it by its expanded name.
///
/// Undeclared prefixes, invalid names and undecodable attribute values make
/// the document ill-formed.
fn is_text_run(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<bool> {
    if !is_qualified_name(e.name().as_ref()) {
        return Err(malformed(
            reader,
            format!("invalid element name '{}'", String::from_utf8_lossy(e.name().as_ref())),
        ));
    }

    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        let key = attr.key.as_ref();

        if !is_qualified_name(key) {
            return Err(malformed(
                reader,
                format!("invalid attribute name '{}'", String::from_utf8_lossy(key)),
            ));
        }
        if attr.value.contains(&b'<') {
            return Err(malformed(reader, "'<' in attribute value"));
        }
        attr.unescape_value().map_err(|err| malformed(reader, err))?;

        if !is_reserved_attribute(key) {
            if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
                return Err(malformed(
                    reader,
                    format!("unbound namespace prefix '{}'", String::from_utf8_lossy(&prefix)),
                ));
            }
        }
    }

    let (ns, local) = reader.resolve_element(e.name());
    match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            Ok(uri == WORDPROCESSINGML_NS.as_bytes()
                && local.as_ref() == TEXT_RUN_ELEMENT.as_bytes())
        }
        ResolveResult::Unbound => Ok(false),
        ResolveResult::Unknown(prefix) => Err(malformed(
            reader,
            format!("unbound namespace prefix '{}'", String::from_utf8_lossy(&prefix)),
        )),
    }
}

/// Concatenate the direct text of every run in `xml`, in document order.
fn collect_run_text(xml: &str) -> Result<String> {
    let mut reader = NsReader::from_str(xml);
    // Run text is taken verbatim, including surrounding whitespace
    reader.config_mut().trim_text(false);

    let mut text = String::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_seen = false;
    let mut runs = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if stack.is_empty() {
                    if root_seen {
                        return Err(malformed(&reader, "multiple root elements"));
                    }
                    root_seen = true;
                }

                // A child element ends its parent's leading text
                if let Some(parent) = stack.last_mut() {
                    parent.collecting = false;
                }

                // Runs are searched among the root's descendants only
                let is_run = is_text_run(&reader, e)? && !stack.is_empty();
                if is_run {
                    runs += 1;
                }

                if matches!(event, Event::Start(_)) {
                    stack.push(Frame { collecting: is_run });
                }
            }
            Event::End(_) => {
                if stack.pop().is_none() {
                    return Err(malformed(&reader, "unmatched end tag"));
                }
            }
            Event::Text(ref e) => match stack.last() {
                Some(frame) => {
                    // Every text node must decode, collected or not
                    let content = e.unescape().map_err(|err| malformed(&reader, err))?;
                    if frame.collecting {
                        trace!(len = content.len(), "run text");
                        text.push_str(&content);
                    }
                }
                None => {
                    if !e.iter().all(|b| matches!(*b, b' ' | b'\t' | b'\r' | b'\n')) {
                        return Err(malformed(&reader, "text outside the root element"));
                    }
                }
            },
            Event::CData(ref e) => match stack.last() {
                Some(frame) if frame.collecting => {
                    let content = std::str::from_utf8(e).map_err(|err| malformed(&reader, err))?;
                    text.push_str(content);
                }
                Some(_) => {}
                None => return Err(malformed(&reader, "CDATA outside the root element")),
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed(
            &reader,
            format!("unexpected end of document, {} element(s) left open", stack.len()),
        ));
    }
    if !root_seen {
        return Err(malformed(&reader, "no root element"));
    }

    debug!(runs, chars = text.chars().count(), "collected run text");
    Ok(text)
}
