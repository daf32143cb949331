//! Part track entity model.
//!
//! A track records which device a part is assigned to. The live row
//! (`deleted_at IS NULL`) is the current assignment; retired rows are kept
//! as assignment history.

use itam_core::datetime::{admin_format, admin_format_opt};
use itam_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `part_tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartTrack {
    pub id: DbId,
    pub part_id: DbId,
    pub device_id: DbId,
    /// When this assignment ended. `None` for the current assignment.
    #[serde(serialize_with = "admin_format_opt")]
    pub deleted_at: Option<Timestamp>,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

impl PartTrack {
    pub fn is_current(&self) -> bool {
        self.deleted_at.is_none()
    }
}
