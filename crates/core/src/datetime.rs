//! Admin-facing timestamp formatting.
//!
//! List views show timestamps as `YYYY-MM-DD HH:MM:SS` (UTC) rather than
//! RFC 3339. Use with `#[serde(serialize_with = ...)]` on model fields.

use serde::Serializer;

use crate::types::Timestamp;

/// Display format for timestamps in the admin UI.
pub const ADMIN_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp in [`ADMIN_DATETIME_FORMAT`].
pub fn format_admin(ts: &Timestamp) -> String {
    ts.format(ADMIN_DATETIME_FORMAT).to_string()
}

/// Serialize a timestamp in [`ADMIN_DATETIME_FORMAT`].
pub fn admin_format<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_admin(ts))
}

/// Serialize an optional timestamp in [`ADMIN_DATETIME_FORMAT`], `null` when absent.
pub fn admin_format_opt<S: Serializer>(
    ts: &Option<Timestamp>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serializer.serialize_some(&format_admin(ts)),
        None => serializer.serialize_none(),
    }
}
