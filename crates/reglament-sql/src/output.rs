use std::fs;
use std::path::Path;

use sha2::Digest;
use tracing::info;

use crate::error::{Result, SqlError};

/// Write the generated script, creating the parent directory if needed.
pub fn write_script(path: &Path, script: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| SqlError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, script).map_err(|source| SqlError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = script.len(), "script written");
    Ok(())
}

/// SHA-256 of the script text, hex encoded.
pub fn script_digest(script: &str) -> String {
    let digest = sha2::Sha256::digest(script.as_bytes());
    hex::encode(digest)
}
