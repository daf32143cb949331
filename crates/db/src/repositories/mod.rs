//! Repository layer.
//!
//! Lookup, track, and import-log repositories are zero-sized structs
//! providing async methods that accept `&PgPool` as the first argument.
//! [`PartRecordRepo`] additionally holds the save guard it applies to every
//! write.

pub mod depreciation_rule_repo;
pub mod device_record_repo;
pub mod import_log_repo;
pub mod part_category_repo;
pub mod part_record_repo;
pub mod part_track_repo;
pub mod purchased_channel_repo;
pub mod vendor_record_repo;

pub use depreciation_rule_repo::DepreciationRuleRepo;
pub use device_record_repo::DeviceRecordRepo;
pub use import_log_repo::ImportLogRepo;
pub use part_category_repo::PartCategoryRepo;
pub use part_record_repo::PartRecordRepo;
pub use part_track_repo::PartTrackRepo;
pub use purchased_channel_repo::PurchasedChannelRepo;
pub use vendor_record_repo::VendorRecordRepo;
