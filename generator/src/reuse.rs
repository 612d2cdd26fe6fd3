// Licensed under the Apache-2.0 license

//! Hash-gated regeneration.
//!
//! The VHDL package is regenerated on every simulation and build invocation,
//! so its writer first reads the token embedded in the first line of any
//! existing output and skips the write when it matches the current
//! regeneration token. A missing file, unreadable file or unexpected header
//! all count as "regeneration needed", never as an error.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::Path;

const TOKEN_PREFIX: &str = "Source hash ";

/// Outcome of a hash-gated write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The artifact was (re)generated and written.
    Written,
    /// The existing artifact matches the current token; nothing was written.
    Skipped,
}

/// Extract the regeneration token from the first line of an artifact.
///
/// Returns `None` when the line does not match the header pattern produced
/// by [`crate::GeneratorInfo`].
pub fn extract_token(first_line: &str) -> Option<&str> {
    let start = first_line.find(TOKEN_PREFIX)? + TOKEN_PREFIX.len();
    let rest = &first_line[start..];
    let token = &rest[..rest.find('.')?];
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// True when `path` already holds output generated from `token`.
pub(crate) fn up_to_date(path: &Path, token: &str) -> bool {
    let Ok(existing) = fs::read_to_string(path) else {
        return false;
    };
    let Some(first_line) = existing.lines().next() else {
        return false;
    };
    extract_token(first_line) == Some(token)
}

/// Write `render()` to `path` unless the file is already up to date.
pub(crate) fn write_if_outdated(
    path: &Path,
    token: &str,
    render: impl FnOnce() -> String,
) -> io::Result<WriteOutcome> {
    if up_to_date(path, token) {
        debug!("{} is up to date, skipping regeneration", path.display());
        return Ok(WriteOutcome::Skipped);
    }
    fs::write(path, render())?;
    info!("wrote {}", path.display());
    Ok(WriteOutcome::Written)
}
