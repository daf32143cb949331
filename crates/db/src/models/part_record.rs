//! Part record entity model and DTOs.

use itam_core::datetime::{admin_format, admin_format_opt};
use itam_core::expiration::expiration_left_days;
use itam_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `part_records` table.
#[derive(Debug, Clone, FromRow, Serialize, Validate)]
pub struct PartRecord {
    pub id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub sn: Option<String>,
    pub asset_number: Option<String>,
    pub specification: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub purchased: Option<Date>,
    pub expired: Option<Date>,
    pub category_id: Option<DbId>,
    pub vendor_id: Option<DbId>,
    pub purchased_channel_id: Option<DbId>,
    pub depreciation_rule_id: Option<DbId>,
    #[serde(serialize_with = "admin_format_opt")]
    pub deleted_at: Option<Timestamp>,
    #[serde(serialize_with = "admin_format")]
    pub created_at: Timestamp,
    #[serde(serialize_with = "admin_format")]
    pub updated_at: Timestamp,
}

impl PartRecord {
    /// Whether the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Days until this part expires, relative to `today`. Negative once expired.
    pub fn expiration_left_days(&self, today: Date) -> Option<i64> {
        expiration_left_days(self.expired, today)
    }
}

/// DTO for creating a new part record.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePartRecord {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub sn: Option<String>,
    pub asset_number: Option<String>,
    pub specification: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub purchased: Option<Date>,
    pub expired: Option<Date>,
    pub category_id: Option<DbId>,
    pub vendor_id: Option<DbId>,
    pub purchased_channel_id: Option<DbId>,
    pub depreciation_rule_id: Option<DbId>,
}

/// DTO for updating an existing part record. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePartRecord {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sn: Option<String>,
    pub asset_number: Option<String>,
    pub specification: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub purchased: Option<Date>,
    pub expired: Option<Date>,
    pub category_id: Option<DbId>,
    pub vendor_id: Option<DbId>,
    pub purchased_channel_id: Option<DbId>,
    pub depreciation_rule_id: Option<DbId>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> PartRecord {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 4, 1, 9, 30, 0).unwrap();
        PartRecord {
            id: 1,
            name: "SSD".to_string(),
            description: None,
            sn: Some("S1".to_string()),
            asset_number: None,
            specification: None,
            price: Some(99.0),
            purchased: Date::from_ymd_opt(2026, 1, 1),
            expired: Date::from_ymd_opt(2026, 1, 31),
            category_id: None,
            vendor_id: Some(5),
            purchased_channel_id: None,
            depreciation_rule_id: None,
            deleted_at: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn serializes_timestamps_for_admin_view() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["created_at"], "2026-04-01 09:30:00");
        assert!(json["deleted_at"].is_null());
        assert_eq!(json["expired"], "2026-01-31");
    }

    #[test]
    fn expiration_left_days_uses_expired_date() {
        let part = sample();
        let today = Date::from_ymd_opt(2026, 1, 21).unwrap();
        assert_eq!(part.expiration_left_days(today), Some(10));
        assert!(!part.is_deleted());
    }

    #[test]
    fn negative_price_fails_validation() {
        let mut part = sample();
        part.price = Some(-1.0);
        assert!(part.validate().is_err());
    }
}
