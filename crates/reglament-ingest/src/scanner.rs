//! Criteria extraction from a single reglament document.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use tracing::{debug, trace};

use reglament_model::{CriterionKey, PendingLookups};

use crate::error::{IngestError, Result, XmlError};
use crate::xml::{local_name, next_event, read_child_texts, text_reader};

const CRITERIA: &[u8] = b"criteria";
const CRITERION: &[u8] = b"criterion";
const REJECTION_REASON: &[u8] = b"rejectionReason";

/// Values accumulated while inside one `criteria` group.
#[derive(Debug, Default)]
struct CriteriaGroup {
    rejection_name: String,
    criterion: CriterionKey,
}

impl CriteriaGroup {
    /// Commit the group into `lookups` and reset it.
    ///
    /// A named rejection reason takes precedence; otherwise the criterion is
    /// kept when it carries a negative meaning.
    fn commit(&mut self, lookups: &mut PendingLookups) {
        let group = std::mem::take(self);
        if !group.rejection_name.is_empty() {
            if lookups.insert_rejection(group.rejection_name.clone()) {
                trace!(name = %group.rejection_name, "rejection reason collected");
            }
        } else if !group.criterion.negative_meaning.is_empty() {
            if lookups.insert_criterion(group.criterion.clone()) {
                trace!(criterion = %group.criterion.name, "criterion collected");
            }
        }
    }
}

/// Open and scan a reglament file.
pub fn scan_reglament_file(path: &Path) -> Result<PendingLookups> {
    let file = File::open(path).map_err(|source| IngestError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let lookups = parse_reglament(BufReader::new(file)).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        rejections = lookups.rejections.len(),
        criteria = lookups.criteria.len(),
        "reglament scanned"
    );
    Ok(lookups)
}

/// Scan a reglament document from any buffered source.
///
/// Every closing `criteria` tag commits at most one entry. Entries start
/// out unresolved.
pub fn parse_reglament<R: BufRead>(input: R) -> std::result::Result<PendingLookups, XmlError> {
    let mut reader = text_reader(input);
    let mut buf = Vec::new();
    let mut child_buf = Vec::new();
    let mut open_elements: Vec<String> = Vec::new();
    let mut group = CriteriaGroup::default();
    let mut lookups = PendingLookups::new();

    loop {
        buf.clear();
        match next_event(&mut reader, &mut buf)? {
            Event::Start(start) => {
                let name = start.local_name();
                match name.as_ref() {
                    CRITERION => {
                        for (child, text) in read_child_texts(&mut reader, &mut child_buf, "criterion")? {
                            match child.as_str() {
                                "name" => group.criterion.name = text,
                                "negativeMeaning" => group.criterion.negative_meaning = text,
                                _ => {}
                            }
                        }
                    }
                    REJECTION_REASON => {
                        for (child, text) in
                            read_child_texts(&mut reader, &mut child_buf, "rejectionReason")?
                        {
                            if child == "name" {
                                group.rejection_name = text;
                            }
                        }
                    }
                    other => open_elements.push(local_name(other)),
                }
            }
            Event::Empty(empty) => {
                // A self-closing group still closes the group.
                if empty.local_name().as_ref() == CRITERIA {
                    group.commit(&mut lookups);
                }
            }
            Event::End(end) => {
                open_elements.pop();
                if end.local_name().as_ref() == CRITERIA {
                    group.commit(&mut lookups);
                }
            }
            Event::Eof => {
                if let Some(element) = open_elements.pop() {
                    return Err(XmlError::UnexpectedEof {
                        element,
                        position: reader.buffer_position(),
                    });
                }
                break;
            }
            _ => {}
        }
    }

    Ok(lookups)
}
