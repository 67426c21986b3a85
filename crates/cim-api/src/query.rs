//! # Query/Filter Service
//!
//! Paginated, filtered retrieval of complaints. Filters are conjunctive
//! and applied only when supplied; results are sorted by `date`
//! descending and paginated with 1-based pages.
//!
//! A single calendar date filter matches the inclusive day range
//! `[00:00:00.000, 23:59:59.999]` against the `date` field.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use cim_core::{is_effectively_escalated, ComplaintStatus, ValidationError};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{ComplaintRecord, Store};

/// Default page size when the caller omits `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A validated complaint query: parsed filters plus pagination.
#[derive(Debug, Clone, Default)]
pub struct ComplaintQuery {
    pub municipality_name: Option<String>,
    pub status: Option<ComplaintStatus>,
    pub category: Option<String>,
    pub complaint_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    /// 1-based page number. Default 1.
    pub page: i64,
    /// Page size. Default [`DEFAULT_PAGE_SIZE`]; no upper bound is enforced.
    pub limit: i64,
}

impl ComplaintQuery {
    /// Build a query from raw pagination inputs, validating that both are
    /// at least 1.
    pub fn with_pagination(mut self, page: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 1 {
            return Err(ValidationError::PageOutOfRange { field: "page", value: page });
        }
        if limit < 1 {
            return Err(ValidationError::PageOutOfRange { field: "limit", value: limit });
        }
        self.page = page;
        self.limit = limit;
        Ok(self)
    }

    fn matches(&self, complaint: &ComplaintRecord) -> bool {
        if let Some(ref name) = self.municipality_name {
            if complaint.municipality_name != *name {
                return false;
            }
        }
        if let Some(status) = self.status {
            if complaint.status != status {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if complaint.complaint_type != *category {
                return false;
            }
        }
        if let Some(id) = self.complaint_id {
            if complaint.id != id {
                return false;
            }
        }
        if let Some(date) = self.date {
            let (start, end) = day_bounds(date);
            if complaint.date < start || complaint.date > end {
                return false;
            }
        }
        true
    }
}

/// Inclusive bounds of a calendar day in UTC: `[00:00:00.000, 23:59:59.999]`.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"));
    let end = Utc.from_utc_datetime(
        &date
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("valid end of day"),
    );
    (start, end)
}

/// A complaint as rendered in list responses: the record plus the derived
/// display-only escalation flag.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: ComplaintRecord,
    /// Read-time derivation; never persisted.
    pub escalated: bool,
}

impl ComplaintView {
    /// Derive the view for a record at the given instant.
    pub fn derive(complaint: ComplaintRecord, now: DateTime<Utc>) -> Self {
        let escalated = is_effectively_escalated(complaint.status, complaint.raised_date, now);
        Self {
            complaint,
            escalated,
        }
    }
}

/// One page of filtered complaints.
#[derive(Debug, Serialize)]
pub struct FilterPage {
    pub complaints: Vec<ComplaintView>,
    pub total_complaints: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Run a query against the complaint store.
///
/// A page past the end of the result set yields an empty list, not an
/// error; `total_pages` is `ceil(total / limit)`.
pub fn filter_complaints(
    store: &Store<ComplaintRecord>,
    query: &ComplaintQuery,
) -> Result<FilterPage, AppError> {
    let mut matching: Vec<ComplaintRecord> =
        store.list().into_iter().filter(|c| query.matches(c)).collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));

    let total = matching.len() as i64;
    let total_pages = (total + query.limit - 1) / query.limit;
    let skip = ((query.page - 1) * query.limit) as usize;

    let now = Utc::now();
    let complaints = matching
        .into_iter()
        .skip(skip)
        .take(query.limit as usize)
        .map(|c| ComplaintView::derive(c, now))
        .collect();

    Ok(FilterPage {
        complaints,
        total_complaints: total,
        total_pages,
        current_page: query.page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn complaint_at(date: DateTime<Utc>, municipality: &str, status: ComplaintStatus) -> ComplaintRecord {
        let id = Uuid::new_v4();
        ComplaintRecord {
            id,
            title: "t".to_string(),
            municipality_name: municipality.to_string(),
            district_id: None,
            state_id: None,
            complaint_type: "Garbage".to_string(),
            location: "somewhere".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            date,
            raised_date: date,
            status,
            description: "d".to_string(),
            image_url: "https://media.example/i.jpg".to_string(),
            evidence_url: None,
            timeline: vec![],
            assigned_to: "N/A".to_string(),
        }
    }

    fn seeded_store() -> Store<ComplaintRecord> {
        let store = Store::new();
        let base = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        for i in 0..5 {
            let c = complaint_at(
                base + Duration::days(i),
                "Rivertown",
                ComplaintStatus::Pending,
            );
            store.insert(c.id, c);
        }
        let other = complaint_at(base, "Lakeside", ComplaintStatus::Solved);
        store.insert(other.id, other);
        store
    }

    fn query() -> ComplaintQuery {
        ComplaintQuery::default().with_pagination(None, None).unwrap()
    }

    #[test]
    fn no_filters_returns_everything_sorted_desc() {
        let store = seeded_store();
        let page = filter_complaints(&store, &query()).unwrap();
        assert_eq!(page.total_complaints, 6);
        assert_eq!(page.current_page, 1);
        let dates: Vec<_> = page.complaints.iter().map(|v| v.complaint.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn filters_are_conjunctive() {
        let store = seeded_store();
        let q = ComplaintQuery {
            municipality_name: Some("Rivertown".to_string()),
            status: Some(ComplaintStatus::Solved),
            ..query()
        };
        let page = filter_complaints(&store, &q).unwrap();
        // Rivertown has no solved complaints.
        assert_eq!(page.total_complaints, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.complaints.is_empty());
    }

    #[test]
    fn date_filter_matches_inclusive_day_range() {
        let store = Store::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let first_instant = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let last_instant = Utc
            .with_ymd_and_hms(2026, 3, 10, 23, 59, 59)
            .unwrap()
            .checked_add_signed(Duration::milliseconds(999))
            .unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap();

        for date in [first_instant, last_instant, next_day] {
            let c = complaint_at(date, "Rivertown", ComplaintStatus::Pending);
            store.insert(c.id, c);
        }

        let q = ComplaintQuery {
            date: Some(day),
            ..query()
        };
        let page = filter_complaints(&store, &q).unwrap();
        assert_eq!(page.total_complaints, 2);
        assert!(page
            .complaints
            .iter()
            .all(|v| v.complaint.date < next_day));
    }

    #[test]
    fn pagination_math_uses_ceiling() {
        let store = seeded_store();
        let q = ComplaintQuery::default()
            .with_pagination(Some(1), Some(4))
            .unwrap();
        let page = filter_complaints(&store, &q).unwrap();
        assert_eq!(page.total_complaints, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.complaints.len(), 4);

        let q = ComplaintQuery::default()
            .with_pagination(Some(2), Some(4))
            .unwrap();
        let page = filter_complaints(&store, &q).unwrap();
        assert_eq!(page.complaints.len(), 2);
    }

    #[test]
    fn page_beyond_end_is_empty_not_an_error() {
        let store = seeded_store();
        let q = ComplaintQuery::default()
            .with_pagination(Some(99), Some(10))
            .unwrap();
        let page = filter_complaints(&store, &q).unwrap();
        assert!(page.complaints.is_empty());
        assert_eq!(page.total_complaints, 6);
        assert_eq!(page.current_page, 99);
    }

    #[test]
    fn zero_page_or_limit_rejected() {
        assert!(ComplaintQuery::default()
            .with_pagination(Some(0), None)
            .is_err());
        assert!(ComplaintQuery::default()
            .with_pagination(None, Some(0))
            .is_err());
        assert!(ComplaintQuery::default()
            .with_pagination(None, Some(-5))
            .is_err());
    }

    #[test]
    fn stale_pending_complaints_render_escalated() {
        let store = Store::new();
        let old = Utc::now() - Duration::days(10);
        let c = complaint_at(old, "Rivertown", ComplaintStatus::Pending);
        store.insert(c.id, c);

        let page = filter_complaints(&store, &query()).unwrap();
        assert!(page.complaints[0].escalated);
        // Persisted status is untouched by the derivation.
        assert_eq!(page.complaints[0].complaint.status, ComplaintStatus::Pending);
    }

    #[test]
    fn filter_by_complaint_id_exact_match() {
        let store = seeded_store();
        let target = store.list().pop().unwrap();
        let q = ComplaintQuery {
            complaint_id: Some(target.id),
            ..query()
        };
        let page = filter_complaints(&store, &q).unwrap();
        assert_eq!(page.total_complaints, 1);
        assert_eq!(page.complaints[0].complaint.id, target.id);
    }
}
