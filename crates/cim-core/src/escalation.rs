//! # Escalation Derivation
//!
//! A complaint that has remained `pending` past a fixed age threshold is
//! treated as *effectively escalated*. This is a display-only
//! classification computed at read time wherever complaints are listed;
//! the persisted status is never auto-transitioned by any background
//! process.

use chrono::{DateTime, Duration, Utc};

use crate::status::ComplaintStatus;

/// Age threshold, in days, after which a pending complaint is considered
/// effectively escalated.
pub const ESCALATION_AGE_DAYS: i64 = 7;

/// Whether a complaint should be displayed as escalated.
///
/// Pure function of `(status, raised_date, now)`: only `pending`
/// complaints escalate, and only once strictly older than
/// [`ESCALATION_AGE_DAYS`]. A complaint already marked `escalated` in
/// storage reports its persisted status through the normal field; this
/// derivation concerns itself with the aging rule alone.
pub fn is_effectively_escalated(
    status: ComplaintStatus,
    raised_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status == ComplaintStatus::Pending
        && now.signed_duration_since(raised_date) > Duration::days(ESCALATION_AGE_DAYS)
}
