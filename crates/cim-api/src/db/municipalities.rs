//! Municipality aggregate persistence operations.
//!
//! Counter mutations driven by complaint transitions go through
//! [`crate::db::complaints::persist_transition`] so they share that
//! transaction; this module covers provisioning and hydration.

use sqlx::PgPool;
use uuid::Uuid;

use crate::state::MunicipalityRecord;

/// Insert a new municipality aggregate.
///
/// Fails on duplicate `district_id`, `district_name`, or
/// `official_username` — the unique business keys.
pub async fn insert(pool: &PgPool, record: &MunicipalityRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO municipalities (id, district_id, district_name, state_id, solved, pending,
                                     demerits, official_username, hashed_password)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(record.id)
    .bind(record.district_id)
    .bind(&record.district_name)
    .bind(record.state_id)
    .bind(record.solved)
    .bind(record.pending)
    .bind(record.demerits)
    .bind(&record.official_username)
    .bind(&record.hashed_password)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all municipality aggregates into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<MunicipalityRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MunicipalityRow>(
        "SELECT id, district_id, district_name, state_id, solved, pending,
                demerits, official_username, hashed_password
         FROM municipalities ORDER BY district_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MunicipalityRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct MunicipalityRow {
    id: Uuid,
    district_id: i64,
    district_name: String,
    state_id: i64,
    solved: i64,
    pending: i64,
    demerits: i64,
    official_username: String,
    hashed_password: String,
}

impl MunicipalityRow {
    fn into_record(self) -> MunicipalityRecord {
        MunicipalityRecord {
            id: self.id,
            district_id: self.district_id,
            district_name: self.district_name,
            state_id: self.state_id,
            solved: self.solved,
            pending: self.pending,
            demerits: self.demerits,
            official_username: self.official_username,
            hashed_password: self.hashed_password,
        }
    }
}
