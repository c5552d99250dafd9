//! Error types for the docxtext library.

use std::io;
use thiserror::Error;

/// Result type alias for docxtext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during text extraction.
///
/// Extraction is all-or-nothing: every failure surfaces as one of these
/// variants and never as a partial or empty string.
#[derive(Error, Debug)]
pub enum Error {
    /// The path does not exist, cannot be read, or is not a ZIP archive.
    #[error("Cannot open archive: {0}")]
    ArchiveOpen(String),

    /// The archive opened but does not contain the document body part.
    #[error("Missing document part: {0}")]
    MissingPart(String),

    /// The body part is not well-formed XML.
    #[error("Malformed document content: {0}")]
    MalformedContent(String),

    /// The body part is password-protected.
    #[error("Document is encrypted")]
    Encrypted,

    /// The body part exists but its compressed data cannot be read.
    #[error("Cannot read archive entry: {0}")]
    ArchiveRead(String),

    /// I/O error while reading an archive entry.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Coarse category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`Error::ArchiveOpen`].
    ArchiveOpen,
    /// See [`Error::MissingPart`].
    MissingPart,
    /// See [`Error::MalformedContent`].
    MalformedContent,
    /// Encrypted entries, corrupt entry data and entry I/O failures.
    ArchiveRead,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ArchiveOpen(_) => ErrorKind::ArchiveOpen,
            Error::MissingPart(_) => ErrorKind::MissingPart,
            Error::MalformedContent(_) => ErrorKind::MalformedContent,
            Error::Encrypted | Error::ArchiveRead(_) | Error::Io(_) => ErrorKind::ArchiveRead,
        }
    }
}

// Only reached while reading the central directory; entry lookups map
// their errors explicitly in `container`.
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveOpen(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedContent(err.to_string())
    }
}
