//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - For editable entities, a `Deserialize` update DTO (all `Option` fields)

pub mod depreciation_rule;
pub mod device_record;
pub mod import_log;
pub mod part_category;
pub mod part_record;
pub mod part_track;
pub mod purchased_channel;
pub mod vendor_record;
