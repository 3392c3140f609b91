//! Error types for reglament ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Low-level failures while streaming an XML document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The tokenizer rejected the document.
    #[error("malformed XML at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// A start tag carries a malformed attribute.
    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: u64,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    /// The document ended while an element was still open.
    #[error("document ends inside <{element}> at byte {position}")]
    UnexpectedEof { element: String, position: u64 },
}

/// Errors that can occur while discovering or scanning reglaments.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Reglaments root is missing or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to walk the reglaments tree.
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to open a reglament file.
    #[error("failed to open reglament {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The reglament is not well-formed XML.
    #[error("reglament {path} could not be parsed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::DirectoryNotFound {
            path: PathBuf::from("reglaments"),
        };
        assert_eq!(err.to_string(), "directory not found: reglaments");
    }

    #[test]
    fn test_parse_error_names_element() {
        let err = IngestError::Parse {
            path: PathBuf::from("reglaments/kostgo.xml"),
            source: XmlError::UnexpectedEof {
                element: "criteria".to_string(),
                position: 120,
            },
        };
        assert_eq!(
            err.to_string(),
            "reglament reglaments/kostgo.xml could not be parsed: \
             document ends inside <criteria> at byte 120"
        );
    }
}
