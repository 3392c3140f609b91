//! Shared types for the reglament migration generator.
//!
//! A reglament yields two kinds of pending lookups: named rejection reasons
//! and criteria carrying a negative-meaning text. Both start out
//! [`ResolvedId::Unresolved`] and are filled in from the dictionaries.

pub mod dictionary;
pub mod entry;
pub mod stats;

pub use dictionary::DictionaryKind;
pub use entry::{CriterionKey, PendingLookups, ResolvedId};
pub use stats::{ServiceStats, char_len, exceeds_full_name_limit};

/// Placeholder written in place of an identifier that no dictionary resolved.
pub const UNRESOLVED_SENTINEL: &str = "TRASH";

/// Assumed length limit of the `full_name` column, in characters.
pub const FULL_NAME_CHAR_LIMIT: usize = 1000;
