//! Dictionary resolution for reglament lookups.
//!
//! Dictionaries are XML files of `record` elements. Each record carries a
//! `recordVersionId` attribute and a JSON object as its text content:
//!
//! ```xml
//! <records>
//!   <record recordVersionId="5f0c...">{"name": "Debt", "code": "12"}</record>
//! </records>
//! ```
//!
//! A service-specific dictionary (`<service>_<kind>.xml`) takes precedence
//! over the general one (`<kind>.xml`).

mod error;
mod locate;
mod record;
mod resolver;

pub use error::{DictionaryError, RecordError, Result};
pub use locate::{DictionaryScope, DictionarySource, locate_dictionary, open_dictionary};
pub use record::DictionaryRecord;
pub use resolver::{PendingLookup, Resolution, resolve_dictionary, resolve_records};
