//! # docxtext
//!
//! Plain text extraction from WordprocessingML (`.docx`) documents.
//!
//! The text of a document is the concatenation, in document order, of every
//! `w:t` run found in `word/document.xml`. No separators are inserted and no
//! formatting, breaks or structure are reconstructed.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Extract from a file
//! let text = docxtext::extract_text("document.docx")?;
//! println!("{}", text);
//!
//! // Extract from bytes already in memory
//! let data = std::fs::read("document.docx")?;
//! let text = docxtext::extract_text_from_bytes(&data)?;
//! # Ok::<(), docxtext::Error>(())
//! ```
//!
//! ## Errors
//!
//! Extraction either returns the full text or fails with one of:
//!
//! - [`Error::ArchiveOpen`]: the path is missing, unreadable, or not a ZIP archive
//! - [`Error::MissingPart`]: the archive has no `word/document.xml`
//! - [`Error::MalformedContent`]: the body part is not well-formed XML

pub mod container;
pub mod error;
pub mod extract;

// Re-exports
pub use container::DocxContainer;
pub use error::{Error, ErrorKind, Result};
pub use extract::{
    ExtractOptions, TextExtractor, BODY_PART, TEXT_RUN_ELEMENT, WORDPROCESSINGML_NS,
};

use std::path::Path;

/// Extract the run text of the document at `path`.
///
/// # Example
///
/// ```no_run
/// use docxtext::extract_text;
///
/// let text = extract_text("document.docx")?;
/// println!("{}", text);
/// # Ok::<(), docxtext::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    TextExtractor::new().extract(path)
}

/// Extract the run text of an in-memory `.docx` archive.
///
/// # Example
///
/// ```no_run
/// use docxtext::extract_text_from_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let text = extract_text_from_bytes(&data)?;
/// # Ok::<(), docxtext::Error>(())
/// ```
pub fn extract_text_from_bytes(data: &[u8]) -> Result<String> {
    TextExtractor::new().extract_bytes(data)
}
