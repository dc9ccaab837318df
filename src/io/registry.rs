//! Cross-run registry of run identities

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::config::RunIdentity;
use crate::Result;

/// Append a run identity to the shared registry file
pub fn append_identity(path: impl AsRef<Path>, identity: &RunIdentity) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format!("{identity}\n").as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Identities recorded so far, oldest first
pub fn read_identities(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}
