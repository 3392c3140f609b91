//! Reglament ingestion.
//!
//! This crate finds the per-service reglament documents under a directory
//! tree and extracts the lookups each one needs resolved:
//!
//! - **Discovery**: walk the reglaments root, one XML file per service
//! - **Scanning**: stream the XML and collect rejection reasons and
//!   negative-meaning criteria, one per `criteria` group
//! - **XML helpers**: subtree text collection shared with the dictionary reader
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use reglament_ingest::{discover_reglaments, scan_reglament_file};
//!
//! for file in discover_reglaments(Path::new("reglaments"))? {
//!     let lookups = scan_reglament_file(&file.path)?;
//!     println!("{}: {} entries", file.service, lookups.len());
//! }
//! ```

mod discovery;
mod error;
mod scanner;
pub mod xml;

// === Error Types ===
pub use error::{IngestError, Result, XmlError};

// === Discovery ===
pub use discovery::{ReglamentFile, discover_reglaments, service_name};

// === Scanning ===
pub use scanner::{parse_reglament, scan_reglament_file};
