//! Error types for the TMX library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for TMX encode/decode operations.
///
/// Structural errors carry the offending attribute or element name and,
/// where applicable, the rejected value, so failures are diagnosable
/// without source line numbers.
#[derive(Error, Debug)]
pub enum Error {
    /// An attribute the schema mandates is absent
    #[error("expected attribute {0:?}")]
    MissingAttribute(&'static str),

    /// An attribute is present but its value is not parseable as its
    /// declared type or is not a member of its enum
    #[error("invalid attribute value {name:?}={value:?}")]
    InvalidAttribute { name: &'static str, value: String },

    /// An element the schema mandates is absent
    #[error("expected element <{0}>")]
    MissingElement(&'static str),

    /// Element content fails structural validation
    #[error("invalid element value <{name}>{value}</{name}>")]
    InvalidElement { name: &'static str, value: String },

    /// A requested feature this implementation does not support
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Document is not well-formed XML
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Input file cannot be opened
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    /// Output file cannot be created
    #[error("cannot create {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an invalid-attribute-value error.
    pub fn invalid_attribute(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidAttribute { name, value: value.into() }
    }

    /// Create an invalid-element-value error.
    pub fn invalid_element(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidElement { name, value: value.into() }
    }

    /// Create an unsupported-feature error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Result type alias for TMX operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::MissingAttribute("firstgid");
        assert_eq!(e.to_string(), "expected attribute \"firstgid\"");

        let e = Error::invalid_attribute("orientation", "diagonal");
        assert_eq!(
            e.to_string(),
            "invalid attribute value \"orientation\"=\"diagonal\""
        );

        let e = Error::MissingElement("data");
        assert_eq!(e.to_string(), "expected element <data>");

        let e = Error::invalid_element("data", "1,2,3");
        assert_eq!(e.to_string(), "invalid element value <data>1,2,3</data>");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
