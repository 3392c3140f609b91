use std::fmt;

use serde::{Deserialize, Serialize};

/// Lookup dictionaries consulted while resolving a reglament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DictionaryKind {
    /// Resolves named rejection reasons.
    RejectReason,
    /// Resolves criteria by their negative-meaning text.
    ReasonForSuccessDecision,
}

impl DictionaryKind {
    pub const ALL: [DictionaryKind; 2] = [
        DictionaryKind::RejectReason,
        DictionaryKind::ReasonForSuccessDecision,
    ];

    /// File stem of the dictionary, as used in `<stem>.xml` and `<service>_<stem>.xml`.
    pub fn file_stem(self) -> &'static str {
        match self {
            DictionaryKind::RejectReason => "rejectReason",
            DictionaryKind::ReasonForSuccessDecision => "reasonForSuccessDecision",
        }
    }

    /// File name of the dictionary shared by every service.
    pub fn general_file_name(self) -> String {
        format!("{}.xml", self.file_stem())
    }

    /// File name of the dictionary dedicated to one service.
    pub fn specific_file_name(self, service: &str) -> String {
        format!("{service}_{}.xml", self.file_stem())
    }
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}
