// Licensed under the Apache-2.0 license

//! Metadata stamped into generated artifacts.

use chrono::{SecondsFormat, Utc};

/// Tool name stamped into generated file headers.
pub const TOOL_NAME: &str = "regmap";

/// Information about one generation pass.
///
/// Passed explicitly into each generator; there is no process-wide state.
/// Tests construct this with fixed values to get deterministic output.
#[derive(Clone, Debug)]
pub struct GeneratorInfo {
    pub tool: String,
    pub version: String,
    /// UTC timestamp, RFC 3339 with second precision.
    pub timestamp: String,
    /// Version-control revision of the register descriptions, when known.
    pub revision: Option<String>,
}

impl GeneratorInfo {
    /// Collect metadata for a generation pass starting now.
    pub fn collect() -> GeneratorInfo {
        GeneratorInfo {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: &str) -> GeneratorInfo {
        self.revision = Some(revision.to_string());
        self
    }

    /// The fixed first-line header carrying the regeneration token.
    /// [`crate::extract_token`] round-trips this exact format.
    pub(crate) fn hash_line(&self, token: &str) -> String {
        format!(
            "Generated by {} {}. Source hash {}.",
            self.tool, self.version, token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reuse::extract_token;

    #[test]
    fn test_hash_line_round_trips() {
        let info = GeneratorInfo::collect();
        let line = info.hash_line("0123abcd");
        assert_eq!(extract_token(&line), Some("0123abcd"));
    }

    #[test]
    fn test_collect_timestamp_is_rfc3339() {
        let info = GeneratorInfo::collect();
        assert!(info.timestamp.ends_with('Z'));
        assert!(info.timestamp.contains('T'));
    }
}
