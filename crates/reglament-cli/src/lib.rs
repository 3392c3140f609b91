//! Library side of the reglament migration CLI.

pub mod logging;
pub mod pipeline;
