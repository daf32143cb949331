//! Import batch outcome constants.
//!
//! These match the values stored in `import_log_details.status`.

use serde::{Deserialize, Serialize};

/// Entity kinds an import batch can target. Stored in `import_logs.item`.
pub const IMPORT_ITEM_PART_RECORD: &str = "part_record";
pub const IMPORT_ITEM_DEVICE_RECORD: &str = "device_record";

/// Outcome of importing a single source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Succeeded,
    Failed,
}

impl ImportOutcome {
    /// Return the outcome name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Parse an outcome string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// All valid outcome values.
    pub const ALL: &'static [&'static str] = &["succeeded", "failed"];
}

impl std::fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
