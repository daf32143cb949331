//! Repository for the `part_records` table.
//!
//! Every write path (create, partial update, full save) runs the
//! [`SaveGuard`] handed to [`PartRecordRepo::new`]. Updates lock the stored
//! row with `SELECT ... FOR UPDATE` and run the guard against it inside the
//! same transaction as the write, so two concurrent writers cannot both
//! pass the check on a row that one of them is deleting.
//!
//! Deletion has a single entry point, [`PartRecordRepo::delete`], which
//! walks [`PART_RECORD_DELETION`]: retire the current track, then mark the
//! row deleted.

use itam_core::error::CoreError;
use itam_core::expiration::validate_purchase_window;
use itam_core::lifecycle::{
    reject_deleted, DeletionStep, SaveGuard, WriteTarget, PART_RECORD_DELETION,
};
use itam_core::sorting::{SortDirection, PART_RECORD_SORT};
use itam_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::error::RepoError;
use crate::models::depreciation_rule::DepreciationRule;
use crate::models::device_record::DeviceRecord;
use crate::models::part_category::PartCategory;
use crate::models::part_record::{CreatePartRecord, PartRecord, UpdatePartRecord};
use crate::models::part_track::PartTrack;
use crate::models::purchased_channel::PurchasedChannel;
use crate::models::vendor_record::VendorRecord;
use crate::repositories::{
    DepreciationRuleRepo, DeviceRecordRepo, PartCategoryRepo, PartTrackRepo,
    PurchasedChannelRepo, VendorRecordRepo,
};

/// Entity name reported in guard errors.
const ENTITY: &str = "part_record";

/// Columns of `part_records` in table order. The sortable set is derived from these.
pub const BASE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "sn",
    "asset_number",
    "specification",
    "price",
    "purchased",
    "expired",
    "category_id",
    "vendor_id",
    "purchased_channel_id",
    "depreciation_rule_id",
    "deleted_at",
    "created_at",
    "updated_at",
];

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, sn, asset_number, specification, price, \
     purchased, expired, category_id, vendor_id, purchased_channel_id, depreciation_rule_id, \
     deleted_at, created_at, updated_at";

/// Provides guarded CRUD operations and relation lookups for part records.
pub struct PartRecordRepo {
    guard: SaveGuard,
}

impl Default for PartRecordRepo {
    /// A repository that refuses writes to soft-deleted records.
    fn default() -> Self {
        Self::new(reject_deleted)
    }
}

impl PartRecordRepo {
    pub fn new(guard: SaveGuard) -> Self {
        Self { guard }
    }

    /// Run the guard, logging refusals.
    fn check(&self, id: Option<DbId>, deleted_at: Option<&Timestamp>) -> Result<(), CoreError> {
        let target = match id {
            Some(id) => WriteTarget::existing(ENTITY, id, deleted_at),
            None => WriteTarget::new_row(ENTITY),
        };
        (self.guard)(&target).map_err(|err| {
            tracing::warn!(part_id = ?id, error = %err, "Write to part record refused");
            err
        })
    }

    // ── Writes ────────────────────────────────────────────────────────

    /// Insert a new part record, returning the created row.
    pub async fn create(
        &self,
        pool: &PgPool,
        input: &CreatePartRecord,
    ) -> Result<PartRecord, RepoError> {
        input.validate()?;
        validate_purchase_window(input.purchased, input.expired)?;
        self.check(None, None)?;

        let query = format!(
            "INSERT INTO part_records
                (name, description, sn, asset_number, specification, price, purchased, expired,
                 category_id, vendor_id, purchased_channel_id, depreciation_rule_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, PartRecord>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.sn)
            .bind(&input.asset_number)
            .bind(&input.specification)
            .bind(input.price)
            .bind(input.purchased)
            .bind(input.expired)
            .bind(input.category_id)
            .bind(input.vendor_id)
            .bind(input.purchased_channel_id)
            .bind(input.depreciation_rule_id)
            .fetch_one(pool)
            .await?;

        tracing::info!(part_id = record.id, "Part record created");
        Ok(record)
    }

    /// Update a part record. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. A soft-deleted
    /// row is reported through the guard and left untouched.
    pub async fn update(
        &self,
        pool: &PgPool,
        id: DbId,
        input: &UpdatePartRecord,
    ) -> Result<Option<PartRecord>, RepoError> {
        input.validate()?;

        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        self.check(Some(id), current.deleted_at.as_ref())?;
        validate_purchase_window(
            input.purchased.or(current.purchased),
            input.expired.or(current.expired),
        )?;

        let query = format!(
            "UPDATE part_records SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                sn = COALESCE($4, sn),
                asset_number = COALESCE($5, asset_number),
                specification = COALESCE($6, specification),
                price = COALESCE($7, price),
                purchased = COALESCE($8, purchased),
                expired = COALESCE($9, expired),
                category_id = COALESCE($10, category_id),
                vendor_id = COALESCE($11, vendor_id),
                purchased_channel_id = COALESCE($12, purchased_channel_id),
                depreciation_rule_id = COALESCE($13, depreciation_rule_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, PartRecord>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.sn)
            .bind(&input.asset_number)
            .bind(&input.specification)
            .bind(input.price)
            .bind(input.purchased)
            .bind(input.expired)
            .bind(input.category_id)
            .bind(input.vendor_id)
            .bind(input.purchased_channel_id)
            .bind(input.depreciation_rule_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Persist every editable field of an in-memory record.
    ///
    /// Both the in-memory `deleted_at` and the stored one are checked.
    /// Clearing a deletion goes through [`PartRecordRepo::restore`], never here.
    pub async fn save(&self, pool: &PgPool, record: &PartRecord) -> Result<PartRecord, RepoError> {
        record.validate()?;
        validate_purchase_window(record.purchased, record.expired)?;
        self.check(Some(record.id), record.deleted_at.as_ref())?;

        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, record.id).await? else {
            return Err(CoreError::NotFound {
                entity: ENTITY,
                id: record.id,
            }
            .into());
        };
        self.check(Some(record.id), current.deleted_at.as_ref())?;

        let query = format!(
            "UPDATE part_records SET
                name = $2, description = $3, sn = $4, asset_number = $5,
                specification = $6, price = $7, purchased = $8, expired = $9,
                category_id = $10, vendor_id = $11, purchased_channel_id = $12,
                depreciation_rule_id = $13
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let saved = sqlx::query_as::<_, PartRecord>(&query)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.sn)
            .bind(&record.asset_number)
            .bind(&record.specification)
            .bind(record.price)
            .bind(record.purchased)
            .bind(record.expired)
            .bind(record.category_id)
            .bind(record.vendor_id)
            .bind(record.purchased_channel_id)
            .bind(record.depreciation_rule_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Lock a row (deleted or not) for the rest of the transaction.
    async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<PartRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM part_records WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, PartRecord>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    // ── Deletion ──────────────────────────────────────────────────────

    /// Retire a part: end its current track, then soft-delete the row.
    ///
    /// Returns `true` if the row was marked deleted. Deleting a missing or
    /// already-deleted record returns `false` without error and leaves its
    /// tracks alone.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Hooks only run for a live row.
        match Self::lock(&mut tx, id).await? {
            Some(stored) if stored.deleted_at.is_none() => {}
            _ => return Ok(false),
        }

        let mut deleted = false;
        for step in PART_RECORD_DELETION.steps() {
            tracing::debug!(part_id = id, step = %step, "Running deletion step");
            match step {
                DeletionStep::EntityHook => {
                    let retired = PartTrackRepo::retire_for_part(&mut tx, id).await?;
                    tracing::debug!(part_id = id, retired, "Part track retired before delete");
                }
                // Part records are not a tree.
                DeletionStep::HierarchyHook => {}
                DeletionStep::SoftDelete => {
                    let result = sqlx::query(
                        "UPDATE part_records SET deleted_at = NOW() \
                         WHERE id = $1 AND deleted_at IS NULL",
                    )
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                    deleted = result.rows_affected() > 0;
                }
            }
        }

        tx.commit().await?;
        if deleted {
            tracing::info!(part_id = id, "Part record soft-deleted");
        }
        Ok(deleted)
    }

    /// Restore a soft-deleted part record. Returns `true` if a row was restored.
    ///
    /// The previous track is not reinstated.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE part_records SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        let restored = result.rows_affected() > 0;
        if restored {
            tracing::info!(part_id = id, "Part record restored");
        }
        Ok(restored)
    }

    /// Permanently delete a part record and its track history.
    /// Returns `true` if the record row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM part_tracks WHERE part_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM part_records WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Reads ─────────────────────────────────────────────────────────

    /// Find a part record by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PartRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM part_records WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, PartRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a part record by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PartRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM part_records WHERE id = $1");
        sqlx::query_as::<_, PartRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all part records, most recently created first. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<PartRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM part_records WHERE deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PartRecord>(&query).fetch_all(pool).await
    }

    /// List live part records ordered by a sortable column.
    ///
    /// `sort` must be in the part record sortable set: a base column other
    /// than the raw foreign keys, or one of the relation/virtual columns
    /// (`vendor.name`, `expiration_left_days`, ...).
    pub async fn list_sorted(
        pool: &PgPool,
        sort: &str,
        direction: SortDirection,
    ) -> Result<Vec<PartRecord>, RepoError> {
        PART_RECORD_SORT.ensure_sortable(BASE_COLUMNS, sort)?;

        let columns = BASE_COLUMNS
            .iter()
            .map(|c| format!("pr.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {columns} FROM part_records pr \
             LEFT JOIN part_categories pc \
                ON pc.id = pr.category_id AND pc.deleted_at IS NULL \
             LEFT JOIN vendor_records vr \
                ON vr.id = pr.vendor_id AND vr.deleted_at IS NULL \
             LEFT JOIN purchased_channels ch \
                ON ch.id = pr.purchased_channel_id AND ch.deleted_at IS NULL \
             LEFT JOIN depreciation_rules dr \
                ON dr.id = pr.depreciation_rule_id AND dr.deleted_at IS NULL \
             WHERE pr.deleted_at IS NULL \
             ORDER BY {order} {dir} NULLS LAST, pr.id ASC",
            order = sort_expression(sort),
            dir = direction.as_sql(),
        );
        let records = sqlx::query_as::<_, PartRecord>(&query)
            .fetch_all(pool)
            .await?;
        Ok(records)
    }

    // ── Relations ─────────────────────────────────────────────────────
    //
    // A missing foreign key, a dangling one, or a soft-deleted target all
    // resolve to `None`.

    pub async fn category(
        pool: &PgPool,
        record: &PartRecord,
    ) -> Result<Option<PartCategory>, sqlx::Error> {
        match record.category_id {
            Some(id) => PartCategoryRepo::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn vendor(
        pool: &PgPool,
        record: &PartRecord,
    ) -> Result<Option<VendorRecord>, sqlx::Error> {
        match record.vendor_id {
            Some(id) => VendorRecordRepo::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn channel(
        pool: &PgPool,
        record: &PartRecord,
    ) -> Result<Option<PurchasedChannel>, sqlx::Error> {
        match record.purchased_channel_id {
            Some(id) => PurchasedChannelRepo::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn depreciation(
        pool: &PgPool,
        record: &PartRecord,
    ) -> Result<Option<DepreciationRule>, sqlx::Error> {
        match record.depreciation_rule_id {
            Some(id) => DepreciationRuleRepo::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// The part's current track.
    pub async fn track(
        pool: &PgPool,
        record: &PartRecord,
    ) -> Result<Option<PartTrack>, sqlx::Error> {
        PartTrackRepo::current_for_part(pool, record.id).await
    }

    /// The device the part is currently assigned to, through its track.
    pub async fn device(
        pool: &PgPool,
        record: &PartRecord,
    ) -> Result<Option<DeviceRecord>, sqlx::Error> {
        let Some(track) = PartTrackRepo::current_for_part(pool, record.id).await? else {
            return Ok(None);
        };
        DeviceRecordRepo::find_by_id(pool, track.device_id).await
    }
}

/// SQL expression to order by for a validated sort key.
fn sort_expression(key: &str) -> String {
    match key {
        "category.name" => "pc.name".to_string(),
        "vendor.name" => "vr.name".to_string(),
        "channel.name" => "ch.name".to_string(),
        "depreciation.name" => "dr.name".to_string(),
        // Days left orders the same way as the expiry date.
        "expiration_left_days" => "pr.expired".to_string(),
        column => format!("pr.{column}"),
    }
}
