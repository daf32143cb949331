//! Integration tests for the part record write guard and deletion path.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Saves to soft-deleted records fail and leave the stored row unchanged
//! - Saves to live records persist new values
//! - Delete marks the row instead of removing it, and is idempotent
//! - Delete retires the part's current track
//! - The injected guard is the one consulted on every write

use assert_matches::assert_matches;
use chrono::NaiveDate;
use itam_core::error::CoreError;
use itam_core::lifecycle::WriteTarget;
use itam_db::error::RepoError;
use itam_db::models::device_record::CreateDeviceRecord;
use itam_db::models::part_record::{CreatePartRecord, UpdatePartRecord};
use itam_db::repositories::{DeviceRecordRepo, PartRecordRepo, PartTrackRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_part(name: &str) -> CreatePartRecord {
    CreatePartRecord {
        name: name.to_string(),
        sn: Some(format!("SN-{name}")),
        price: Some(129.5),
        ..Default::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn refuse_all(_: &WriteTarget<'_>) -> Result<(), CoreError> {
    Err(CoreError::Conflict("inventory is frozen".into()))
}

fn allow_all(_: &WriteTarget<'_>) -> Result<(), CoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Test: save on a live record persists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_live_record_persists(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("RAM")).await.unwrap();

    let update = UpdatePartRecord {
        name: Some("RAM 32GB".to_string()),
        vendor_id: Some(3),
        ..Default::default()
    };
    let updated = repo.update(&pool, part.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.name, "RAM 32GB");
    assert_eq!(updated.vendor_id, Some(3));
    assert_eq!(updated.sn.as_deref(), Some("SN-RAM"), "untouched fields are kept");

    let reloaded = PartRecordRepo::find_by_id(&pool, part.id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "RAM 32GB");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_save_live_record_persists(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let mut part = repo.create(&pool, &new_part("SSD")).await.unwrap();

    part.specification = Some("2TB NVMe".to_string());
    part.price = Some(210.0);
    let saved = repo.save(&pool, &part).await.unwrap();

    assert_eq!(saved.specification.as_deref(), Some("2TB NVMe"));
    assert_eq!(saved.price, Some(210.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_record_returns_none(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let result = repo
        .update(&pool, 999_999, &UpdatePartRecord::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: save on a soft-deleted record is refused
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_deleted_record_is_refused_and_row_unchanged(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("GPU")).await.unwrap();
    assert!(PartRecordRepo::delete(&pool, part.id).await.unwrap());

    let before = PartRecordRepo::find_by_id_include_deleted(&pool, part.id)
        .await
        .unwrap()
        .unwrap();

    let update = UpdatePartRecord {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let err = repo.update(&pool, part.id, &update).await.unwrap_err();
    assert_matches!(
        err,
        RepoError::Core(CoreError::AlreadyDeleted { entity: "part_record", id }) if id == part.id
    );

    let after = PartRecordRepo::find_by_id_include_deleted(&pool, part.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.name, "GPU");
    assert_eq!(after.updated_at, before.updated_at, "row must not be written");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_save_of_deleted_record_is_refused(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("PSU")).await.unwrap();
    PartRecordRepo::delete(&pool, part.id).await.unwrap();

    let mut loaded = PartRecordRepo::find_by_id_include_deleted(&pool, part.id)
        .await
        .unwrap()
        .unwrap();
    assert!(loaded.is_deleted());
    loaded.name = "PSU 850W".to_string();

    let err = repo.save(&pool, &loaded).await.unwrap_err();
    assert_eq!(err.as_core().map(CoreError::status_code), Some(401));

    let stored = PartRecordRepo::find_by_id_include_deleted(&pool, part.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "PSU");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_live_copy_cannot_overwrite_deleted_row(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let mut stale = repo.create(&pool, &new_part("NIC")).await.unwrap();
    PartRecordRepo::delete(&pool, stale.id).await.unwrap();

    // The in-memory copy still looks live; the stored row decides.
    stale.name = "NIC 10G".to_string();
    let err = repo.save(&pool, &stale).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::AlreadyDeleted { .. }));
}

// ---------------------------------------------------------------------------
// Test: delete is a soft delete and idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_marks_row_instead_of_removing(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("Fan")).await.unwrap();

    assert!(PartRecordRepo::delete(&pool, part.id).await.unwrap());

    assert!(PartRecordRepo::find_by_id(&pool, part.id).await.unwrap().is_none());
    let row = PartRecordRepo::find_by_id_include_deleted(&pool, part.id)
        .await
        .unwrap()
        .expect("row should still exist");
    assert!(row.deleted_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_idempotent(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("Cable")).await.unwrap();

    let first = PartRecordRepo::delete(&pool, part.id).await.unwrap();
    let second = PartRecordRepo::delete(&pool, part.id).await.unwrap();
    assert!(first, "first delete should mark the row");
    assert!(!second, "second delete should be a no-op, not an error");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_retires_current_track(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("CPU")).await.unwrap();
    let device = DeviceRecordRepo::create(
        &pool,
        &CreateDeviceRecord {
            name: "Workstation".to_string(),
            description: None,
            asset_number: Some("WS-01".to_string()),
        },
    )
    .await
    .unwrap();
    PartTrackRepo::assign(&pool, part.id, device.id).await.unwrap();

    PartRecordRepo::delete(&pool, part.id).await.unwrap();

    assert!(PartTrackRepo::current_for_part(&pool, part.id)
        .await
        .unwrap()
        .is_none());
    let history = PartTrackRepo::history_for_part(&pool, part.id).await.unwrap();
    assert_eq!(history.len(), 1, "retired track stays in history");
    assert!(!history[0].is_current());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_again_leaves_tracks_alone(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("GPU")).await.unwrap();
    assert!(PartRecordRepo::delete(&pool, part.id).await.unwrap());

    // A live track left behind by legacy data on an already-retired part.
    sqlx::query("INSERT INTO part_tracks (part_id, device_id) VALUES ($1, 77)")
        .bind(part.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(!PartRecordRepo::delete(&pool, part.id).await.unwrap());
    let current = PartTrackRepo::current_for_part(&pool, part.id)
        .await
        .unwrap()
        .expect("second delete must not run the track hook");
    assert_eq!(current.device_id, 77);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_missing_part_leaves_tracks_alone(pool: PgPool) {
    sqlx::query("INSERT INTO part_tracks (part_id, device_id) VALUES (9001, 78)")
        .execute(&pool)
        .await
        .unwrap();

    assert!(!PartRecordRepo::delete(&pool, 9001).await.unwrap());
    assert!(PartTrackRepo::current_for_part(&pool, 9001)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Test: assignment respects the part's lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_to_deleted_part_is_refused(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("NIC")).await.unwrap();
    let device = DeviceRecordRepo::create(
        &pool,
        &CreateDeviceRecord {
            name: "Router".to_string(),
            description: None,
            asset_number: None,
        },
    )
    .await
    .unwrap();
    PartRecordRepo::delete(&pool, part.id).await.unwrap();

    let result = PartTrackRepo::assign(&pool, part.id, device.id).await;
    assert_matches!(
        result,
        Err(RepoError::Core(CoreError::AlreadyDeleted { entity: "part_record", id })) if id == part.id
    );

    assert!(PartTrackRepo::current_for_part(&pool, part.id)
        .await
        .unwrap()
        .is_none());
    assert!(PartRecordRepo::device(&pool, &part).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_to_missing_part_is_not_found(pool: PgPool) {
    let result = PartTrackRepo::assign(&pool, 9002, 1).await;
    assert_matches!(
        result,
        Err(RepoError::Core(CoreError::NotFound { entity: "part_record", id: 9002 }))
    );
    assert!(PartTrackRepo::history_for_part(&pool, 9002)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Test: restore and hard delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_allows_saving_again(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("Battery")).await.unwrap();
    PartRecordRepo::delete(&pool, part.id).await.unwrap();

    assert!(PartRecordRepo::restore(&pool, part.id).await.unwrap());

    let update = UpdatePartRecord {
        description: Some("back in stock".to_string()),
        ..Default::default()
    };
    let updated = repo.update(&pool, part.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.description.as_deref(), Some("back in stock"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_removes_row(pool: PgPool) {
    let repo = PartRecordRepo::default();
    let part = repo.create(&pool, &new_part("Screw")).await.unwrap();

    assert!(PartRecordRepo::hard_delete(&pool, part.id).await.unwrap());
    assert!(PartRecordRepo::find_by_id_include_deleted(&pool, part.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: validation and guard injection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_invalid_input(pool: PgPool) {
    let repo = PartRecordRepo::default();

    let empty_name = CreatePartRecord {
        name: String::new(),
        ..Default::default()
    };
    assert_matches!(
        repo.create(&pool, &empty_name).await,
        Err(RepoError::Core(CoreError::Validation(_)))
    );

    let inverted_dates = CreatePartRecord {
        purchased: Some(date(2026, 5, 1)),
        expired: Some(date(2026, 4, 1)),
        ..new_part("Dock")
    };
    assert_matches!(
        repo.create(&pool, &inverted_dates).await,
        Err(RepoError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_injected_guard_runs_on_create(pool: PgPool) {
    let frozen = PartRecordRepo::new(refuse_all);
    assert_matches!(
        frozen.create(&pool, &new_part("Mouse")).await,
        Err(RepoError::Core(CoreError::Conflict(_)))
    );
    assert!(PartRecordRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_permissive_guard_allows_writing_deleted_row(pool: PgPool) {
    let part = PartRecordRepo::default()
        .create(&pool, &new_part("Keyboard"))
        .await
        .unwrap();
    PartRecordRepo::delete(&pool, part.id).await.unwrap();

    let permissive = PartRecordRepo::new(allow_all);
    let update = UpdatePartRecord {
        name: Some("Keyboard (archived)".to_string()),
        ..Default::default()
    };
    let updated = permissive
        .update(&pool, part.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Keyboard (archived)");
    assert!(updated.is_deleted(), "update must not clear the deletion");
}
