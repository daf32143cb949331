//! Vendor entity model and DTOs.

use itam_core::datetime::admin_format;
use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vendor_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VendorRecord {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

/// DTO for creating a new vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVendorRecord {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}
