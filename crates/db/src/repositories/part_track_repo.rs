//! Repository for the `part_tracks` table.
//!
//! At most one live track exists per part (enforced by a partial unique
//! index). Retiring a track soft-deletes it so it stays in the history.

use itam_core::error::CoreError;
use itam_core::lifecycle::{reject_deleted, WriteTarget};
use itam_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::error::{is_unique_violation, RepoError};
use crate::models::part_track::PartTrack;

/// Partial unique index allowing one live track per part.
const LIVE_TRACK_INDEX: &str = "uq_part_tracks_live_part_id";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, part_id, device_id, deleted_at, created_at, updated_at";

/// Provides assignment operations for part tracks.
pub struct PartTrackRepo;

impl PartTrackRepo {
    /// Assign a part to a device, retiring any current assignment first.
    ///
    /// The part row is locked for the duration of the transaction, so a
    /// concurrent [`PartRecordRepo::delete`](crate::repositories::PartRecordRepo::delete)
    /// either runs first (and the assignment is refused) or waits for it.
    pub async fn assign(
        pool: &PgPool,
        part_id: DbId,
        device_id: DbId,
    ) -> Result<PartTrack, RepoError> {
        let mut tx = pool.begin().await?;

        let part: Option<(Option<Timestamp>,)> =
            sqlx::query_as("SELECT deleted_at FROM part_records WHERE id = $1 FOR UPDATE")
                .bind(part_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((deleted_at,)) = part else {
            return Err(CoreError::NotFound {
                entity: "part_record",
                id: part_id,
            }
            .into());
        };
        reject_deleted(&WriteTarget::existing("part_record", part_id, deleted_at.as_ref()))
            .map_err(|err| {
                tracing::warn!(part_id, device_id, "Assignment of deleted part refused");
                err
            })?;

        Self::retire_for_part(&mut tx, part_id).await?;

        let query = format!(
            "INSERT INTO part_tracks (part_id, device_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let track = match sqlx::query_as::<_, PartTrack>(&query)
            .bind(part_id)
            .bind(device_id)
            .fetch_one(&mut *tx)
            .await
        {
            Ok(track) => track,
            Err(err) if is_unique_violation(&err, LIVE_TRACK_INDEX) => {
                return Err(CoreError::Conflict(format!(
                    "part {part_id} already has a live track"
                ))
                .into());
            }
            Err(err) => return Err(err.into()),
        };

        tx.commit().await?;
        tracing::info!(part_id, device_id, track_id = track.id, "Part assigned to device");
        Ok(track)
    }

    /// The part's current (live) track, if any.
    pub async fn current_for_part(
        pool: &PgPool,
        part_id: DbId,
    ) -> Result<Option<PartTrack>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM part_tracks WHERE part_id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, PartTrack>(&query)
            .bind(part_id)
            .fetch_optional(pool)
            .await
    }

    /// Every track the part has had, current one included, newest first.
    pub async fn history_for_part(
        pool: &PgPool,
        part_id: DbId,
    ) -> Result<Vec<PartTrack>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM part_tracks WHERE part_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PartTrack>(&query)
            .bind(part_id)
            .fetch_all(pool)
            .await
    }

    /// End the part's current assignment. Returns `true` if a track was retired.
    pub async fn retire(pool: &PgPool, part_id: DbId) -> Result<bool, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let retired = Self::retire_for_part(&mut conn, part_id).await?;
        Ok(retired > 0)
    }

    /// Soft-delete the part's live track on an existing connection or
    /// transaction. Returns the number of rows retired (0 or 1).
    pub async fn retire_for_part(conn: &mut PgConnection, part_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE part_tracks SET deleted_at = NOW() WHERE part_id = $1 AND deleted_at IS NULL",
        )
        .bind(part_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
