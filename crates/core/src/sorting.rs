//! Sortable-field projection for admin list views.
//!
//! Each entity declares two static lists: virtual/relational columns that
//! should be sortable, and raw columns (usually foreign keys) that should
//! not. The sortable set is `(base ∪ include) − except`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Static allow/deny lists for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct SortColumns {
    /// Virtual or relational columns added to the sortable set.
    pub include: &'static [&'static str],
    /// Raw columns removed from the sortable set.
    pub except: &'static [&'static str],
}

impl SortColumns {
    /// Compute the sortable set for a concrete list of base columns.
    ///
    /// Base columns keep their declaration order, include columns follow.
    /// Duplicates are dropped.
    pub fn sortable(&self, base: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(base.len() + self.include.len());
        for col in base.iter().chain(self.include.iter()) {
            if self.except.iter().any(|e| e == col) || out.iter().any(|c| c == col) {
                continue;
            }
            out.push((*col).to_string());
        }
        out
    }

    /// Check that `requested` is sortable for the given base columns.
    pub fn ensure_sortable(&self, base: &[&str], requested: &str) -> Result<(), CoreError> {
        if self.sortable(base).iter().any(|c| c == requested) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "'{requested}' is not a sortable column"
            )))
        }
    }
}

/// Part records: relation names are sortable, raw foreign keys are not.
pub const PART_RECORD_SORT: SortColumns = SortColumns {
    include: &[
        "category.name",
        "vendor.name",
        "channel.name",
        "depreciation.name",
        "expiration_left_days",
    ],
    except: &[
        "category_id",
        "vendor_id",
        "purchased_channel_id",
        "depreciation_rule_id",
        "deleted_at",
    ],
};

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}
