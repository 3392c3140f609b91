//! Streaming resolution of pending lookups against dictionary records.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use tracing::{debug, info};

use reglament_ingest::xml::{attribute_value, next_event, read_element_text, text_reader};
use reglament_model::{CriterionKey, DictionaryKind, PendingLookups, ResolvedId};

use crate::error::{DictionaryError, RecordError, Result};
use crate::locate::{DictionarySource, open_dictionary};
use crate::record::DictionaryRecord;

const RECORD: &[u8] = b"record";
const RECORD_VERSION_ID: &[u8] = b"recordVersionId";

/// Entries that a dictionary record can resolve.
pub trait PendingLookup {
    /// Assign `record.version_id` to every entry the record matches.
    ///
    /// Returns the number of entries assigned.
    fn apply(&mut self, record: &DictionaryRecord) -> usize;
}

/// Rejection reasons are matched on the record's `name`.
impl PendingLookup for BTreeMap<String, ResolvedId> {
    fn apply(&mut self, record: &DictionaryRecord) -> usize {
        let Some(name) = record.field("name") else {
            return 0;
        };
        match self.get_mut(name) {
            Some(slot) => {
                *slot = ResolvedId::Resolved(record.version_id.clone());
                1
            }
            None => 0,
        }
    }
}

/// Criteria are matched on `{name, negativeMeaning}` when the record carries
/// both, otherwise on the record's `name` against the negative-meaning text.
impl PendingLookup for BTreeMap<CriterionKey, ResolvedId> {
    fn apply(&mut self, record: &DictionaryRecord) -> usize {
        let Some(name) = record.field("name") else {
            return 0;
        };
        if record.has_field("negativeMeaning") {
            let Some(negative_meaning) = record.field("negativeMeaning") else {
                return 0;
            };
            let key = CriterionKey::new(name, negative_meaning);
            return match self.get_mut(&key) {
                Some(slot) => {
                    *slot = ResolvedId::Resolved(record.version_id.clone());
                    1
                }
                None => 0,
            };
        }

        let mut assigned = 0;
        for (key, slot) in self.iter_mut() {
            if key.negative_meaning == name {
                *slot = ResolvedId::Resolved(record.version_id.clone());
                assigned += 1;
            }
        }
        assigned
    }
}

/// Stream the `record` elements of a dictionary into `lookups`.
///
/// Records without a `recordVersionId` are skipped. The first record that
/// fails to decode stops the stream; assignments made before it are kept.
pub fn resolve_records<R, L>(input: R, lookups: &mut L) -> std::result::Result<usize, RecordError>
where
    R: BufRead,
    L: PendingLookup + ?Sized,
{
    let mut reader = text_reader(input);
    let mut buf = Vec::new();
    let mut text_buf = Vec::new();
    let mut assigned = 0;

    loop {
        buf.clear();
        match next_event(&mut reader, &mut buf)? {
            Event::Start(start) if start.local_name().as_ref() == RECORD => {
                let version_id =
                    attribute_value(&start, RECORD_VERSION_ID, reader.buffer_position())?;
                let text = read_element_text(&mut reader, &mut text_buf, "record")?;
                if let Some(version_id) = version_id {
                    let record = DictionaryRecord::parse(version_id, &text)?;
                    assigned += apply_record(lookups, &record);
                }
            }
            Event::Empty(empty) if empty.local_name().as_ref() == RECORD => {
                if let Some(version_id) =
                    attribute_value(&empty, RECORD_VERSION_ID, reader.buffer_position())?
                {
                    let record = DictionaryRecord::parse(version_id, "")?;
                    assigned += apply_record(lookups, &record);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(assigned)
}

fn apply_record<L: PendingLookup + ?Sized>(lookups: &mut L, record: &DictionaryRecord) -> usize {
    let assigned = lookups.apply(record);
    if assigned > 0 {
        debug!(record = %record.version_id, assigned, "dictionary record matched");
    }
    assigned
}

/// Outcome of resolving one dictionary kind for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub source: DictionarySource,
    pub assigned: usize,
}

/// Open the dictionary of `kind` for `service` and resolve the matching
/// half of `lookups` against it.
pub fn resolve_dictionary(
    dictionaries_dir: &Path,
    service: &str,
    kind: DictionaryKind,
    lookups: &mut PendingLookups,
) -> Result<Resolution> {
    let (source, file) = open_dictionary(dictionaries_dir, service, kind)?;
    let input = BufReader::new(file);
    let outcome = match kind {
        DictionaryKind::RejectReason => resolve_records(input, &mut lookups.rejections),
        DictionaryKind::ReasonForSuccessDecision => resolve_records(input, &mut lookups.criteria),
    };
    let assigned = outcome.map_err(|source_error| DictionaryError::Parse {
        path: source.path.clone(),
        source: source_error,
    })?;
    info!(
        service,
        dictionary = %kind,
        path = %source.path.display(),
        assigned,
        "dictionary resolved"
    );
    Ok(Resolution { source, assigned })
}
