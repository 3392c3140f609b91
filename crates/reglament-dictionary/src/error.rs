use std::path::PathBuf;

use reglament_ingest::XmlError;
use reglament_model::DictionaryKind;
use thiserror::Error;

/// Failures while decoding the records of one dictionary stream.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("record {record_id} does not hold valid JSON: {source}")]
    Json {
        record_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {record_id} does not hold a JSON object")]
    NotAnObject { record_id: String },
}

/// Errors raised while opening or reading a dictionary file.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The service-specific dictionary exists but could not be opened.
    #[error("failed to open dictionary {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the specific nor the general dictionary could be opened.
    #[error("{kind} dictionary unavailable ({path}): {source}")]
    Unavailable {
        kind: DictionaryKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded; the rest of the file was not read.
    #[error("failed to parse dictionary {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: RecordError,
    },
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
