//! # Complaint Lifecycle Service
//!
//! The single mutation path for complaints. Transitions apply an explicit
//! [`ComplaintPatch`] (absent fields untouched), append one timestamp to
//! the complaint's timeline, and keep the owning municipality's
//! solved/pending counters consistent.
//!
//! ## Counter bookkeeping
//!
//! Counters change only when a complaint *enters* `solved` — a previous
//! status of `solved` leaves them alone, so re-solving cannot
//! double-count. The municipality is matched by `municipality_name` ==
//! `district_name`; no match is a silent no-op, not an error.
//!
//! ## Durability
//!
//! When a database pool is configured, the complaint row update and the
//! counter increment are executed in a single transaction
//! ([`crate::db::complaints::persist_transition`]), so a crash cannot
//! leave the durable aggregate out of sync with complaint statuses.

use chrono::Utc;
use cim_core::{ComplaintPatch, ComplaintStatus};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, ComplaintRecord, MunicipalityRecord};

/// A file payload received for evidence upload.
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Apply a status/assignee transition to a complaint.
///
/// Returns the updated record, or [`AppError::NotFound`] if the ID does
/// not resolve. The patch is validated before any store mutation.
pub async fn transition(
    state: &AppState,
    complaint_id: Uuid,
    patch: ComplaintPatch,
) -> Result<ComplaintRecord, AppError> {
    patch.validate()?;

    let now = Utc::now();
    let mut previous_status = ComplaintStatus::Pending;
    let updated = state
        .complaints
        .update(&complaint_id, |complaint| {
            previous_status = complaint.status;
            if let Some(status) = patch.status {
                complaint.status = status;
            }
            if let Some(ref assignee) = patch.assigned_to {
                complaint.assigned_to = assignee.clone();
            }
            complaint.timeline.push(now);
        })
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    let municipality = apply_solved_bookkeeping(state, &updated, previous_status);
    persist(state, &updated, municipality.as_ref()).await?;

    tracing::info!(
        complaint = %complaint_id,
        status = %updated.status,
        assigned_to = %updated.assigned_to,
        "complaint transition applied"
    );

    Ok(updated)
}

/// Attach resolution evidence to a complaint.
///
/// Uploads the payload to the media host, then sets `evidence_url`,
/// forces the status to `solved` (overriding any caller-provided status),
/// appends a timeline entry, and applies the usual counter bookkeeping.
///
/// The upload happens before the complaint lookup, mirroring the wire
/// contract: an unknown ID after a successful upload orphans the uploaded
/// object, which is accepted and logged rather than cleaned up.
pub async fn attach_evidence(
    state: &AppState,
    complaint_id: Uuid,
    file: EvidenceFile,
) -> Result<(ComplaintRecord, String), AppError> {
    if file.bytes.is_empty() {
        return Err(AppError::Validation("No file uploaded".to_string()));
    }

    let media = state
        .media_client
        .as_ref()
        .ok_or_else(|| AppError::Unconfigured("Media host is not configured".to_string()))?;

    let receipt = media
        .upload(file.bytes, file.filename, file.content_type)
        .await?;

    let now = Utc::now();
    let mut previous_status = ComplaintStatus::Pending;
    let updated = state
        .complaints
        .update(&complaint_id, |complaint| {
            previous_status = complaint.status;
            if let Some(ref existing) = complaint.evidence_url {
                tracing::warn!(
                    complaint = %complaint_id,
                    previous = %existing,
                    replacement = %receipt.secure_url,
                    "overwriting existing resolution evidence; prior upload is orphaned"
                );
            }
            complaint.evidence_url = Some(receipt.secure_url.clone());
            complaint.status = ComplaintStatus::Solved;
            complaint.timeline.push(now);
        })
        .ok_or_else(|| {
            tracing::warn!(
                complaint = %complaint_id,
                orphaned_url = %receipt.secure_url,
                "evidence uploaded for unknown complaint; object is orphaned on the media host"
            );
            AppError::NotFound("Complaint not found".to_string())
        })?;

    let municipality = apply_solved_bookkeeping(state, &updated, previous_status);
    persist(state, &updated, municipality.as_ref()).await?;

    tracing::info!(
        complaint = %complaint_id,
        url = %receipt.secure_url,
        "evidence attached and complaint marked solved"
    );

    Ok((updated, receipt.secure_url))
}

/// Adjust the owning municipality's counters when a complaint enters
/// `solved`: `solved` += 1, `pending` -= 1.
///
/// Returns the updated municipality when bookkeeping applied, `None` when
/// the complaint did not enter `solved` or no aggregate matches the
/// complaint's `municipality_name`.
fn apply_solved_bookkeeping(
    state: &AppState,
    complaint: &ComplaintRecord,
    previous_status: ComplaintStatus,
) -> Option<MunicipalityRecord> {
    if complaint.status != ComplaintStatus::Solved || previous_status == ComplaintStatus::Solved {
        return None;
    }

    let municipality_id = state
        .municipalities
        .find_id(|m| m.district_name == complaint.municipality_name);

    match municipality_id {
        Some(id) => state.municipalities.update(&id, |m| {
            m.solved += 1;
            m.pending -= 1;
        }),
        None => {
            tracing::debug!(
                municipality = %complaint.municipality_name,
                "no aggregate matches complaint's municipality; counters unchanged"
            );
            None
        }
    }
}

/// Write the transition through to the database, transactionally pairing
/// the complaint row update with the counter increment.
async fn persist(
    state: &AppState,
    complaint: &ComplaintRecord,
    municipality: Option<&MunicipalityRecord>,
) -> Result<(), AppError> {
    if let Some(pool) = &state.db_pool {
        crate::db::complaints::persist_transition(
            pool,
            complaint,
            municipality.map(|m| m.district_name.as_str()),
        )
        .await?;
    }
    Ok(())
}
