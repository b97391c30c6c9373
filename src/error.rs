//! Error types for the rocket document importer.
//!
//! Only problems that make the input unreadable are errors. Anything the
//! importer can recover from is reported as a [`Warning`](crate::Warning)
//! instead and the import carries on.

use thiserror::Error;

/// Fatal errors that abort an import.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute parsing error
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// The token stream ended or nested in a way that cannot be recovered
    #[error("Malformed XML in input: {0}")]
    Malformed(String),

    /// The input is neither a native nor an interchange document
    #[error("Unsupported or unrecognized file type")]
    UnknownFormat,

    /// The document parsed but contained no rocket design
    #[error("File does not contain a rocket design")]
    NoDesign,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, Error>;
