//! Integration tests for ledger reads: filter correctness, ordering,
//! server-side counts, and the bulk-read ceiling.

use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use sharptrack_core::types::{DbId, Timestamp};
use sharptrack_db::models::asset::CreateAsset;
use sharptrack_db::models::maintenance_event::{EventFilter, EventStatus};
use sharptrack_db::paging::read_events;
use sharptrack_db::repositories::{AssetRepo, LookupRepo, MaintenanceEventRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seed {
    branch_a: DbId,
    branch_b: DbId,
    asset_type_id: DbId,
    maintenance_type_id: DbId,
    user_id: DbId,
}

async fn seed(pool: &PgPool) -> Seed {
    let branch_a = sqlx::query_scalar("INSERT INTO branches (name) VALUES ('North') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap();
    let branch_b = sqlx::query_scalar("INSERT INTO branches (name) VALUES ('South') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap();
    let asset_type_id =
        sqlx::query_scalar("INSERT INTO asset_types (name) VALUES ('band saw') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let maintenance_type_id = sqlx::query_scalar(
        "INSERT INTO maintenance_types (name) VALUES ('sharpen') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let user_id = sqlx::query_scalar("INSERT INTO users (name) VALUES ('tech') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap();
    Seed {
        branch_a,
        branch_b,
        asset_type_id,
        maintenance_type_id,
        user_id,
    }
}

async fn new_asset(pool: &PgPool, seed: &Seed, branch_id: DbId, code: &str) -> DbId {
    AssetRepo::create(
        pool,
        &CreateAsset {
            code: code.to_string(),
            asset_type_id: seed.asset_type_id,
            branch_id,
        },
    )
    .await
    .unwrap()
    .id
}

fn ts(y: i32, m: u32, d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Insert a closed ledger row directly; filter tests need history in bulk,
/// not the state machine.
async fn insert_closed(
    pool: &PgPool,
    seed: &Seed,
    asset_id: DbId,
    opened: Timestamp,
    closed: Timestamp,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO maintenance_events \
            (asset_id, maintenance_type_id, performed_by, date_opened, date_closed) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(asset_id)
    .bind(seed.maintenance_type_id)
    .bind(seed.user_id)
    .bind(opened)
    .bind(closed)
    .fetch_one(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Filters and ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn filter_by_asset_and_status(pool: PgPool) {
    let seed = seed(&pool).await;
    let a1 = new_asset(&pool, &seed, seed.branch_a, "SAW-101").await;
    let a2 = new_asset(&pool, &seed, seed.branch_a, "SAW-102").await;

    insert_closed(&pool, &seed, a1, ts(2026, 7, 1), ts(2026, 7, 2)).await;
    insert_closed(&pool, &seed, a1, ts(2026, 8, 1), ts(2026, 8, 2)).await;
    insert_closed(&pool, &seed, a2, ts(2026, 8, 5), ts(2026, 8, 6)).await;

    sqlx::query(
        "INSERT INTO maintenance_events \
            (asset_id, maintenance_type_id, performed_by, date_opened) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(a2)
    .bind(seed.maintenance_type_id)
    .bind(seed.user_id)
    .bind(ts(2026, 8, 10))
    .execute(&pool)
    .await
    .unwrap();

    let filter = EventFilter {
        asset_id: Some(a1),
        status: EventStatus::Closed,
        ..EventFilter::default()
    };
    let rows = MaintenanceEventRepo::fetch_page(&pool, &filter, 100, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|e| e.asset_id == a1 && !e.is_open()));

    let open_only = EventFilter {
        status: EventStatus::Open,
        ..EventFilter::default()
    };
    let rows = MaintenanceEventRepo::fetch_page(&pool, &open_only, 100, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_open() && rows[0].asset_id == a2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn closed_history_orders_by_close_date_desc(pool: PgPool) {
    let seed = seed(&pool).await;
    let asset = new_asset(&pool, &seed, seed.branch_a, "SAW-103").await;

    insert_closed(&pool, &seed, asset, ts(2026, 6, 1), ts(2026, 6, 2)).await;
    let latest = insert_closed(&pool, &seed, asset, ts(2026, 8, 1), ts(2026, 8, 2)).await;
    insert_closed(&pool, &seed, asset, ts(2026, 7, 1), ts(2026, 7, 2)).await;

    let rows = MaintenanceEventRepo::fetch_page(&pool, &EventFilter::closed_history(asset), 100, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, latest);
    assert!(rows[0].date_closed >= rows[1].date_closed);
    assert!(rows[1].date_closed >= rows[2].date_closed);

    let by_id = MaintenanceEventRepo::find_by_id(&pool, latest)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_id.date_closed, rows[0].date_closed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn branch_scope_joins_through_assets(pool: PgPool) {
    let seed = seed(&pool).await;
    let north = new_asset(&pool, &seed, seed.branch_a, "SAW-104").await;
    let south = new_asset(&pool, &seed, seed.branch_b, "SAW-105").await;

    insert_closed(&pool, &seed, north, ts(2026, 8, 1), ts(2026, 8, 2)).await;
    insert_closed(&pool, &seed, south, ts(2026, 8, 1), ts(2026, 8, 2)).await;

    let filter = EventFilter {
        branch_id: Some(seed.branch_b),
        ..EventFilter::default()
    };
    let rows = MaintenanceEventRepo::fetch_page(&pool, &filter, 100, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].asset_id, south);
}

// ---------------------------------------------------------------------------
// Counts vs. the fetch ceiling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn count_is_exact_past_the_read_ceiling(pool: PgPool) {
    let seed = seed(&pool).await;
    let asset = new_asset(&pool, &seed, seed.branch_a, "SAW-106").await;

    for day in 1..=8 {
        insert_closed(&pool, &seed, asset, ts(2026, 8, day), ts(2026, 8, day)).await;
    }

    let filter = EventFilter::opened_between(None, ts(2026, 8, 1), ts(2026, 9, 1));

    // A bounded fetch stops at its ceiling...
    let sample = read_events(&pool, filter.clone(), 5).await.unwrap();
    assert_eq!(sample.len(), 5);

    // ...but the count query reports the true bucket size.
    let count = MaintenanceEventRepo::count(&pool, &filter).await.unwrap();
    assert_eq!(count, 8);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_bucket_counts_zero(pool: PgPool) {
    let seed = seed(&pool).await;
    let asset = new_asset(&pool, &seed, seed.branch_a, "SAW-107").await;
    insert_closed(&pool, &seed, asset, ts(2026, 8, 1), ts(2026, 8, 2)).await;

    let filter = EventFilter::opened_between(None, ts(2026, 1, 1), ts(2026, 2, 1));
    let count = MaintenanceEventRepo::count(&pool, &filter).await.unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn maintenance_types_resolve_by_ids(pool: PgPool) {
    let seed = seed(&pool).await;
    let types = LookupRepo::maintenance_types_by_ids(&pool, &[seed.maintenance_type_id])
        .await
        .unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "sharpen");
}
