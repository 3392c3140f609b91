//! Migration script generation.
//!
//! This crate turns resolved reglament lookups into a PL/pgSQL `do` block:
//!
//! - **Literals**: quoting, comment-safe rendering, dollar-quote selection
//! - **Script**: per-service insert statements inside a per-schema loop,
//!   guarded against duplicates, with audit comments for anything that
//!   needs a human
//! - **Output**: writing the script and fingerprinting it

mod error;
pub mod literal;
mod output;
mod script;

pub use error::{Result, SqlError};
pub use literal::{comment_out, comment_text, dollar_quote_tag, sql_literal};
pub use output::{script_digest, write_script};
pub use script::{ScriptBuilder, ScriptOptions, ServiceSection, generate_script};
