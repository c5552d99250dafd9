//! ZIP container abstraction for WordprocessingML documents.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;

/// Rewrite a UTF-16 encoding declaration to UTF-8.
///
/// Once UTF-16 XML has been decoded into a Rust `String` the declaration
/// no longer describes the buffer, and quick-xml would try to honour it.
fn fix_xml_encoding_declaration(content: String) -> String {
    if !content.starts_with("<?xml") {
        return content;
    }
    let Some(end_decl) = content.find("?>") else {
        return content;
    };

    let (decl, rest) = content.split_at(end_decl + 2);
    let fixed_decl = decl
        .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
        .replace("encoding='UTF-16'", "encoding='UTF-8'")
        .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
        .replace("encoding='utf-16'", "encoding='UTF-8'");

    format!("{}{}", fixed_decl, rest)
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
///
/// Bytes that are neither valid UTF-8 nor recognisable UTF-16 cannot be
/// well-formed XML and are reported as [`Error::MalformedContent`].
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return std::str::from_utf8(rest)
            .map(str::to_owned)
            .map_err(|e| Error::MalformedContent(format!("invalid UTF-8: {}", e)));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(fix_xml_encoding_declaration);
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(fix_xml_encoding_declaration);
    }

    // ASCII markup in UTF-16 leaves a null byte in every other position
    if bytes.len() >= 4 && bytes[0] != 0 && bytes[1] == 0 && bytes[3] == 0 {
        return decode_utf16(bytes, u16::from_le_bytes).map(fix_xml_encoding_declaration);
    }
    if bytes.len() >= 4 && bytes[0] == 0 && bytes[1] != 0 && bytes[2] == 0 {
        return decode_utf16(bytes, u16::from_be_bytes).map(fix_xml_encoding_declaration);
    }

    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| Error::MalformedContent(format!("invalid UTF-8: {}", e)))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::MalformedContent(
            "UTF-16 content has an odd number of bytes".to_string(),
        ));
    }

    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedContent(format!("invalid UTF-16: {}", e)))
}

/// A `.docx` package opened for reading.
///
/// The container owns its reader, so an archive opened from a path holds
/// the file handle exactly as long as the container lives.
pub struct DocxContainer<R> {
    archive: zip::ZipArchive<R>,
}

impl DocxContainer<BufReader<File>> {
    /// Open a container from a file path.
    ///
    /// Any failure to open the file or to read it as a ZIP archive is
    /// reported as [`Error::ArchiveOpen`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docxtext::container::DocxContainer;
    ///
    /// let container = DocxContainer::open("document.docx")?;
    /// assert!(container.exists("word/document.xml"));
    /// # Ok::<(), docxtext::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {}", path.display(), e)))?;
        let archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| Error::ArchiveOpen(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), entries = archive.len(), "opened archive");
        Ok(Self { archive })
    }
}

impl DocxContainer<Cursor<Vec<u8>>> {
    /// Create a container from an in-memory archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> DocxContainer<R> {
    /// Create a container from any seekable reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read the raw bytes of a part.
    ///
    /// Returns [`Error::MissingPart`] if no entry has that exact name.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingPart(name.to_string()),
            ZipError::UnsupportedArchive(msg) if msg == ZipError::PASSWORD_REQUIRED => {
                Error::Encrypted
            }
            ZipError::Io(io) => Error::Io(io),
            other => Error::ArchiveRead(format!("{}: {}", name, other)),
        })?;

        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| Error::ArchiveRead(format!("{}: {}", name, e)))?;

        debug!(part = name, bytes = data.len(), "read part");
        Ok(data)
    }

    /// Read a part and decode it to a string.
    ///
    /// Handles UTF-8 (with or without BOM) and UTF-16 LE/BE.
    pub fn read_xml(&mut self, name: &str) -> Result<String> {
        let bytes = self.read_part(name)?;
        decode_xml_bytes(&bytes)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// List all part names in the archive.
    pub fn list_parts(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }
}

impl<R: Read + Seek> std::fmt::Debug for DocxContainer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxContainer")
            .field("parts", &self.archive.len())
            .finish()
    }
}
