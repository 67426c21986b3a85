//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds the three record collections the stack owns:
//! - **Complaints** — individual complaint records with status and timeline
//! - **Municipalities** — per-municipality aggregates (counters + official credentials)
//! - **States** — state-tier records (identity + official credentials)
//!
//! plus the media client for evidence uploads (external collaborator) and
//! an optional PostgreSQL pool for durable persistence. The in-memory
//! stores are authoritative for reads; when a pool is configured they are
//! hydrated from it at startup and every mutation is written through.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cim_core::ComplaintStatus;
use cim_media_client::MediaClient;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{AuthKeys, AuthKeysError};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Find the first record matching a predicate.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// Find the key of the first record matching a predicate.
    pub fn find_id(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Uuid> {
        self.data
            .read()
            .iter()
            .find(|(_, v)| pred(v))
            .map(|(id, _)| *id)
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Record Types -------------------------------------------------------------

/// A complaint record.
///
/// Created externally by citizen intake (out of scope here) with status
/// `pending`; mutated only by the lifecycle service; never deleted.
/// `raised_date` is immutable after creation — it feeds the escalation-age
/// derivation. `timeline` is append-only: one timestamp per state-affecting
/// mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    pub id: Uuid,
    pub title: String,
    /// Join key to the municipality aggregate (`district_name`).
    pub municipality_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<i64>,
    /// Category label (e.g. "Potholes"). No referential integrity with the
    /// category catalog.
    #[serde(rename = "type")]
    pub complaint_type: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: DateTime<Utc>,
    pub raised_date: DateTime<Utc>,
    pub status: ComplaintStatus,
    pub description: String,
    /// Evidence-of-issue image attached at intake.
    pub image_url: String,
    /// Resolution evidence, set by the evidence-upload operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
    pub timeline: Vec<DateTime<Utc>>,
    pub assigned_to: String,
}

/// A per-municipality aggregate: derived counters plus the identity and
/// credential fields of the municipal official.
///
/// `district_id`, `district_name`, and `official_username` are unique
/// business keys (enforced by the schema); the store key is a plain Uuid.
/// The password hash never serializes to the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MunicipalityRecord {
    pub id: Uuid,
    pub district_id: i64,
    pub district_name: String,
    pub state_id: i64,
    /// Count of solved complaints. Mutated only by lifecycle bookkeeping.
    pub solved: i64,
    /// Count of not-yet-solved complaints. Mutated only by lifecycle bookkeeping.
    pub pending: i64,
    /// Penalty score. Read-only in this service.
    pub demerits: i64,
    pub official_username: String,
    /// Argon2 PHC hash of the official's password.
    #[serde(default, skip_serializing)]
    pub hashed_password: String,
}

/// A state-tier record: identity plus the state official's credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    pub id: Uuid,
    pub state_id: i64,
    pub state_name: String,
    pub official_username: String,
    #[serde(default, skip_serializing)]
    pub hashed_password: String,
}

// -- Application State --------------------------------------------------------

/// Application configuration.
///
/// Custom `Debug` redacts the JWT secret to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// HMAC secret for signing bearer tokens. Must be at least 32 characters.
    pub jwt_secret: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 4040,
            jwt_secret: "dev-mode-secret-not-for-production-use-123456".to_string(),
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each `Store`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub complaints: Store<ComplaintRecord>,
    pub municipalities: Store<MunicipalityRecord>,
    pub states: Store<StateRecord>,

    /// Validated token signing/verification keys.
    pub auth: AuthKeys,

    /// Client for the evidence media host. When `None`, the evidence
    /// upload endpoint returns 503.
    pub media_client: Option<MediaClient>,

    /// PostgreSQL connection pool for durable persistence.
    /// When `None`, the API operates in in-memory-only mode.
    pub db_pool: Option<PgPool>,

    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration, no media
    /// client, and no database pool. Intended for tests and development.
    ///
    /// # Panics
    ///
    /// Panics if the default development secret fails validation — which
    /// would be a programming error, not a runtime condition.
    pub fn new() -> Self {
        Self::try_with_config(AppConfig::default(), None, None)
            .expect("default AppConfig must produce valid auth keys")
    }

    /// Create a new application state with the given configuration,
    /// optional media client, and optional database pool.
    pub fn try_with_config(
        config: AppConfig,
        media_client: Option<MediaClient>,
        db_pool: Option<PgPool>,
    ) -> Result<Self, AuthKeysError> {
        let auth = AuthKeys::new(&config.jwt_secret)?;

        Ok(Self {
            complaints: Store::new(),
            municipalities: Store::new(),
            states: Store::new(),
            auth,
            media_client,
            db_pool,
            config,
        })
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations remain fast and synchronous against memory.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let complaints = crate::db::complaints::load_all(pool).await?;
        let complaint_count = complaints.len();
        for record in complaints {
            self.complaints.insert(record.id, record);
        }

        let municipalities = crate::db::municipalities::load_all(pool).await?;
        let municipality_count = municipalities.len();
        for record in municipalities {
            self.municipalities.insert(record.id, record);
        }

        let states = crate::db::states::load_all(pool).await?;
        let state_count = states.len();
        for record in states {
            self.states.insert(record.id, record);
        }

        tracing::info!(
            complaints = complaint_count,
            municipalities = municipality_count,
            states = state_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Helper: create a minimal ComplaintRecord for store tests.
    fn sample_complaint(id: Uuid) -> ComplaintRecord {
        let now = Utc::now();
        ComplaintRecord {
            id,
            title: "Pothole on Elm Street".to_string(),
            municipality_name: "Rivertown".to_string(),
            district_id: Some(101),
            state_id: Some(7),
            complaint_type: "Potholes".to_string(),
            location: "Elm Street, block 4".to_string(),
            latitude: 28.6139,
            longitude: 77.209,
            date: now,
            raised_date: now,
            status: ComplaintStatus::Pending,
            description: "Deep pothole near the bus stop".to_string(),
            image_url: "https://media.example/issues/pothole.jpg".to_string(),
            evidence_url: None,
            timeline: vec![],
            assigned_to: "N/A".to_string(),
        }
    }

    // -- Store tests ----------------------------------------------------------

    #[test]
    fn store_insert_and_get_roundtrip() {
        let store = Store::new();
        let id = Uuid::new_v4();
        let prev = store.insert(id, sample_complaint(id));
        assert!(prev.is_none(), "first insert should return None");

        let retrieved = store.get(&id).unwrap();
        assert_eq!(retrieved.id, id);
        assert_eq!(retrieved.municipality_name, "Rivertown");
    }

    #[test]
    fn store_find_matches_predicate() {
        let store = Store::new();
        let id1 = Uuid::new_v4();
        let id2 = Uuid::new_v4();
        store.insert(id1, sample_complaint(id1));
        let mut other = sample_complaint(id2);
        other.municipality_name = "Lakeside".to_string();
        store.insert(id2, other);

        let found = store.find(|c| c.municipality_name == "Lakeside").unwrap();
        assert_eq!(found.id, id2);
        assert!(store.find(|c| c.municipality_name == "Nowhere").is_none());

        assert_eq!(
            store.find_id(|c| c.municipality_name == "Lakeside"),
            Some(id2)
        );
    }

    #[test]
    fn store_update_modifies_existing() {
        let store = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, sample_complaint(id));

        let updated = store.update(&id, |c| {
            c.status = ComplaintStatus::Solved;
        });
        assert_eq!(updated.unwrap().status, ComplaintStatus::Solved);
        assert_eq!(store.get(&id).unwrap().status, ComplaintStatus::Solved);
    }

    #[test]
    fn store_update_returns_none_for_missing_key() {
        let store: Store<ComplaintRecord> = Store::new();
        assert!(store
            .update(&Uuid::new_v4(), |c| c.status = ComplaintStatus::Solved)
            .is_none());
    }

    #[test]
    fn store_clone_shares_underlying_data() {
        let store = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, sample_complaint(id));

        let clone = store.clone();
        assert_eq!(clone.len(), 1);

        let id2 = Uuid::new_v4();
        clone.insert(id2, sample_complaint(id2));
        assert_eq!(store.len(), 2);
    }

    // -- Record serialization -------------------------------------------------

    #[test]
    fn complaint_serializes_camel_case() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(sample_complaint(id)).unwrap();
        assert!(json.get("municipalityName").is_some());
        assert!(json.get("raisedDate").is_some());
        assert!(json.get("assignedTo").is_some());
        assert_eq!(json["type"], "Potholes");
        // Absent evidence is omitted, not null.
        assert!(json.get("evidenceUrl").is_none());
    }

    #[test]
    fn municipality_never_serializes_password_hash() {
        let record = MunicipalityRecord {
            id: Uuid::new_v4(),
            district_id: 101,
            district_name: "Rivertown".to_string(),
            state_id: 7,
            solved: 3,
            pending: 5,
            demerits: 0,
            official_username: "cityA_admin".to_string(),
            hashed_password: "$argon2id$v=19$secret".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("hashed_password"));
    }

    // -- AppState tests -------------------------------------------------------

    #[test]
    fn app_state_new_creates_empty_stores() {
        let state = AppState::new();
        assert!(state.complaints.is_empty());
        assert!(state.municipalities.is_empty());
        assert!(state.states.is_empty());
        assert!(state.media_client.is_none());
        assert!(state.db_pool.is_none());
    }

    #[test]
    fn app_state_rejects_short_secret() {
        let config = AppConfig {
            port: 4040,
            jwt_secret: "short".to_string(),
        };
        assert!(AppState::try_with_config(config, None, None).is_err());
    }

    #[test]
    fn app_config_debug_redacts_secret() {
        let config = AppConfig::default();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("dev-mode-secret"));
    }
}
