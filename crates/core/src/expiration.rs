//! Purchase and expiry date helpers for inventory items.

use crate::error::CoreError;
use crate::types::Date;

/// Days remaining until `expired`, counted from `today`.
///
/// Negative once the item has expired. `None` when no expiry is recorded.
pub fn expiration_left_days(expired: Option<Date>, today: Date) -> Option<i64> {
    expired.map(|e| (e - today).num_days())
}

/// An item cannot expire before it was purchased.
pub fn validate_purchase_window(
    purchased: Option<Date>,
    expired: Option<Date>,
) -> Result<(), CoreError> {
    match (purchased, expired) {
        (Some(p), Some(e)) if e < p => Err(CoreError::Validation(format!(
            "expired date {e} is before purchased date {p}"
        ))),
        _ => Ok(()),
    }
}
