//! Complaint persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `complaints` table.
//! Status strings are parsed through [`ComplaintStatus`] at the
//! application layer, not constrained in SQL.

use chrono::{DateTime, Utc};
use cim_core::ComplaintStatus;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::ComplaintRecord;

/// Serialize a timeline slice to JSON for persistence.
fn serialize_timeline(timeline: &[DateTime<Utc>]) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(timeline).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize complaint timeline");
        sqlx::Error::Encode(Box::new(e))
    })
}

/// Insert a new complaint record.
pub async fn insert(pool: &PgPool, record: &ComplaintRecord) -> Result<(), sqlx::Error> {
    let timeline = serialize_timeline(&record.timeline)?;

    sqlx::query(
        "INSERT INTO complaints (id, title, municipality_name, district_id, state_id, complaint_type,
                                 location, latitude, longitude, date, raised_date, status,
                                 description, image_url, evidence_url, timeline, assigned_to)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.municipality_name)
    .bind(record.district_id)
    .bind(record.state_id)
    .bind(&record.complaint_type)
    .bind(&record.location)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(record.date)
    .bind(record.raised_date)
    .bind(record.status.as_str())
    .bind(&record.description)
    .bind(&record.image_url)
    .bind(&record.evidence_url)
    .bind(&timeline)
    .bind(&record.assigned_to)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist a lifecycle transition: the complaint's mutable fields plus,
/// when bookkeeping applied, the owning municipality's counters — in one
/// transaction, so a crash cannot split the pair.
///
/// The counter update is a SQL-side relative increment, immune to
/// out-of-order persistence of concurrent transitions.
pub async fn persist_transition(
    pool: &PgPool,
    complaint: &ComplaintRecord,
    municipality_name: Option<&str>,
) -> Result<(), sqlx::Error> {
    let timeline = serialize_timeline(&complaint.timeline)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE complaints
         SET status = $1, assigned_to = $2, evidence_url = $3, timeline = $4
         WHERE id = $5",
    )
    .bind(complaint.status.as_str())
    .bind(&complaint.assigned_to)
    .bind(&complaint.evidence_url)
    .bind(&timeline)
    .bind(complaint.id)
    .execute(&mut *tx)
    .await?;

    if let Some(name) = municipality_name {
        sqlx::query(
            "UPDATE municipalities SET solved = solved + 1, pending = pending - 1
             WHERE district_name = $1",
        )
        .bind(name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Load all complaints from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<ComplaintRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ComplaintRow>(
        "SELECT id, title, municipality_name, district_id, state_id, complaint_type,
                location, latitude, longitude, date, raised_date, status,
                description, image_url, evidence_url, timeline, assigned_to
         FROM complaints ORDER BY date",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ComplaintRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ComplaintRow {
    id: Uuid,
    title: String,
    municipality_name: String,
    district_id: Option<i64>,
    state_id: Option<i64>,
    complaint_type: String,
    location: String,
    latitude: f64,
    longitude: f64,
    date: DateTime<Utc>,
    raised_date: DateTime<Utc>,
    status: String,
    description: String,
    image_url: String,
    evidence_url: Option<String>,
    timeline: serde_json::Value,
    assigned_to: String,
}

impl ComplaintRow {
    fn into_record(self) -> ComplaintRecord {
        // READ path: default on parse failure for forward-compatibility
        // with old rows, but log at ERROR — it may indicate corruption.
        let status: ComplaintStatus = self.status.parse().unwrap_or_else(|e| {
            tracing::error!(
                id = %self.id,
                status = %self.status,
                error = %e,
                "unknown complaint status in database — defaulting to pending; investigate"
            );
            ComplaintStatus::Pending
        });

        let timeline: Vec<DateTime<Utc>> =
            serde_json::from_value(self.timeline).unwrap_or_else(|e| {
                tracing::error!(
                    id = %self.id,
                    error = %e,
                    "failed to deserialize complaint timeline — defaulting to empty; investigate"
                );
                Vec::new()
            });

        ComplaintRecord {
            id: self.id,
            title: self.title,
            municipality_name: self.municipality_name,
            district_id: self.district_id,
            state_id: self.state_id,
            complaint_type: self.complaint_type,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            date: self.date,
            raised_date: self.raised_date,
            status,
            description: self.description,
            image_url: self.image_url,
            evidence_url: self.evidence_url,
            timeline,
            assigned_to: self.assigned_to,
        }
    }
}
