//! State-tier record persistence operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::state::StateRecord;

/// Insert a new state record.
pub async fn insert(pool: &PgPool, record: &StateRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO states (id, state_id, state_name, official_username, hashed_password)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id)
    .bind(record.state_id)
    .bind(&record.state_name)
    .bind(&record.official_username)
    .bind(&record.hashed_password)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all state records into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<StateRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StateRow>(
        "SELECT id, state_id, state_name, official_username, hashed_password
         FROM states ORDER BY state_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(StateRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct StateRow {
    id: Uuid,
    state_id: i64,
    state_name: String,
    official_username: String,
    hashed_password: String,
}

impl StateRow {
    fn into_record(self) -> StateRecord {
        StateRecord {
            id: self.id,
            state_id: self.state_id,
            state_name: self.state_name,
            official_username: self.official_username,
            hashed_password: self.hashed_password,
        }
    }
}
