//! Purchase channel entity model and DTOs.

use itam_core::datetime::admin_format;
use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `purchased_channels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchasedChannel {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchasedChannel {
    pub name: String,
    pub description: Option<String>,
}
