//! Dictionary file selection.

use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use reglament_model::DictionaryKind;

use crate::error::{DictionaryError, Result};

/// Whether a dictionary belongs to one service or is shared by all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryScope {
    Specific,
    General,
}

impl fmt::Display for DictionaryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryScope::Specific => f.write_str("specific"),
            DictionaryScope::General => f.write_str("general"),
        }
    }
}

/// The dictionary file chosen for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionarySource {
    pub kind: DictionaryKind,
    pub scope: DictionaryScope,
    pub path: PathBuf,
}

impl fmt::Display for DictionarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.scope)
    }
}

fn candidates(dir: &Path, service: &str, kind: DictionaryKind) -> [DictionarySource; 2] {
    [
        DictionarySource {
            kind,
            scope: DictionaryScope::Specific,
            path: dir.join(kind.specific_file_name(service)),
        },
        DictionarySource {
            kind,
            scope: DictionaryScope::General,
            path: dir.join(kind.general_file_name()),
        },
    ]
}

/// Report which dictionary file would serve `service`, without opening it.
pub fn locate_dictionary(
    dir: &Path,
    service: &str,
    kind: DictionaryKind,
) -> Option<DictionarySource> {
    candidates(dir, service, kind)
        .into_iter()
        .find(|source| source.path.is_file())
}

/// Open the dictionary serving `service`.
///
/// Falls back to the general dictionary only when the service-specific one
/// does not exist; any other failure on the specific file is reported.
pub fn open_dictionary(
    dir: &Path,
    service: &str,
    kind: DictionaryKind,
) -> Result<(DictionarySource, File)> {
    let [specific, general] = candidates(dir, service, kind);
    match File::open(&specific.path) {
        Ok(file) => return Ok((specific, file)),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            info!(
                service,
                dictionary = %kind,
                path = %specific.path.display(),
                "no service-specific dictionary, using the general one"
            );
        }
        Err(source) => {
            return Err(DictionaryError::Open {
                path: specific.path,
                source,
            });
        }
    }

    match File::open(&general.path) {
        Ok(file) => Ok((general, file)),
        Err(source) => Err(DictionaryError::Unavailable {
            kind,
            path: general.path,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_specific_dictionary_preferred() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("rejectReason.xml"), "<records/>").unwrap();
        std::fs::write(dir.path().join("kostgo_rejectReason.xml"), "<records/>").unwrap();

        let (source, _) = open_dictionary(dir.path(), "kostgo", DictionaryKind::RejectReason).unwrap();
        assert_eq!(source.scope, DictionaryScope::Specific);
        assert!(source.path.ends_with("kostgo_rejectReason.xml"));
    }

    #[test]
    fn test_general_dictionary_fallback() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("reasonForSuccessDecision.xml"), "<records/>").unwrap();

        let located = locate_dictionary(
            dir.path(),
            "kostgo",
            DictionaryKind::ReasonForSuccessDecision,
        )
        .unwrap();
        assert_eq!(located.scope, DictionaryScope::General);

        let (source, _) = open_dictionary(
            dir.path(),
            "kostgo",
            DictionaryKind::ReasonForSuccessDecision,
        )
        .unwrap();
        assert_eq!(source, located);
    }

    #[test]
    fn test_missing_dictionaries_unavailable() {
        let dir = TempDir::new().unwrap();
        assert!(locate_dictionary(dir.path(), "kostgo", DictionaryKind::RejectReason).is_none());
        let err = open_dictionary(dir.path(), "kostgo", DictionaryKind::RejectReason).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::Unavailable {
                kind: DictionaryKind::RejectReason,
                ..
            }
        ));
    }
}
