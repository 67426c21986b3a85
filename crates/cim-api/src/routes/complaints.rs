//! # Complaint Routes
//!
//! ## Endpoints
//!
//! - `GET /complaints/:id` — fetch one complaint
//! - `PATCH /complaints/update` — status/assignee transition
//! - `POST /complaints/uploadEvidence` — multipart evidence upload → solved
//! - `POST /complaints/filter` — paginated filtered query
//!
//! All complaint routes require a bearer token. Evidence uploads are
//! capped at 10 MB by the body limit on this router.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use cim_core::{ComplaintPatch, ComplaintStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::lifecycle::{self, EvidenceFile};
use crate::query::{self, ComplaintQuery, ComplaintView};
use crate::state::AppState;

/// Evidence uploads are capped at 10 MB.
const MAX_EVIDENCE_BYTES: usize = 10 * 1024 * 1024;

// ── Request/Response DTOs ───────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ComplaintResponse {
    pub success: bool,
    pub complaint: ComplaintView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Transition request. `status`, when present, must be one of the four
/// valid values; it is parsed (and rejected) before any store mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub complaint_id: Uuid,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

impl UpdateComplaintRequest {
    /// Parse the raw status string into a validated patch.
    fn into_patch(self) -> Result<(Uuid, ComplaintPatch), AppError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ComplaintStatus>)
            .transpose()?;
        Ok((
            self.complaint_id,
            ComplaintPatch {
                status,
                assigned_to: self.assigned_to,
            },
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct UploadEvidenceResponse {
    pub success: bool,
    pub url: String,
    pub complaint: ComplaintView,
    pub message: String,
}

/// Filter request: every field optional, filters conjunctive.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub municipality_name: Option<String>,
    pub status: Option<String>,
    /// Matches the complaint's `type` field exactly.
    pub category: Option<String>,
    pub complaint_id: Option<Uuid>,
    /// A single calendar date, matched as an inclusive day range.
    pub date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl FilterRequest {
    fn into_query(self) -> Result<ComplaintQuery, AppError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ComplaintStatus>)
            .transpose()?;
        let query = ComplaintQuery {
            municipality_name: self.municipality_name,
            status,
            category: self.category,
            complaint_id: self.complaint_id,
            date: self.date,
            ..ComplaintQuery::default()
        }
        .with_pagination(self.page, self.limit)?;
        Ok(query)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub success: bool,
    pub complaints: Vec<ComplaintView>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_complaints: i64,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the complaints router. All routes here are bearer-protected by
/// the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/complaints/:id", get(get_complaint))
        .route("/complaints/update", patch(update_complaint))
        .route(
            "/complaints/uploadEvidence",
            post(upload_evidence).layer(DefaultBodyLimit::max(MAX_EVIDENCE_BYTES)),
        )
        .route("/complaints/filter", post(filter_complaints))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /complaints/:id — Fetch one complaint.
async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintResponse>, AppError> {
    state
        .complaints
        .get(&id)
        .map(|c| {
            Json(ComplaintResponse {
                success: true,
                complaint: ComplaintView::derive(c, Utc::now()),
                message: None,
            })
        })
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))
}

/// PATCH /complaints/update — Apply a status/assignee transition.
async fn update_complaint(
    State(state): State<AppState>,
    claims: Claims,
    body: Result<Json<UpdateComplaintRequest>, JsonRejection>,
) -> Result<Json<ComplaintResponse>, AppError> {
    let (complaint_id, patch) = extract_json(body)?.into_patch()?;
    tracing::debug!(official = %claims.username, complaint = %complaint_id, "transition requested");
    let updated = lifecycle::transition(&state, complaint_id, patch).await?;

    Ok(Json(ComplaintResponse {
        success: true,
        complaint: ComplaintView::derive(updated, Utc::now()),
        message: Some("Complaint updated successfully".to_string()),
    }))
}

/// POST /complaints/uploadEvidence — Upload resolution evidence.
///
/// Multipart form with a `complaintId` text part and an `evidence` file
/// part. The file check runs first: a form without one is rejected with
/// "No file uploaded" before anything else happens.
async fn upload_evidence(
    State(state): State<AppState>,
    claims: Claims,
    mut multipart: Multipart,
) -> Result<Json<UploadEvidenceResponse>, AppError> {
    let mut complaint_id: Option<Uuid> = None;
    let mut file: Option<EvidenceFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        // Take an owned copy of the name: `text()`/`bytes()` consume the field.
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("complaintId") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                let id = raw
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| AppError::Validation(format!("invalid complaintId: {raw}")))?;
                complaint_id = Some(id);
            }
            Some("evidence") => {
                let filename = field.file_name().unwrap_or("evidence").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                file = Some(EvidenceFile {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let complaint_id =
        complaint_id.ok_or_else(|| AppError::Validation("complaintId is required".to_string()))?;

    tracing::debug!(official = %claims.username, complaint = %complaint_id, "evidence upload requested");
    let (updated, url) = lifecycle::attach_evidence(&state, complaint_id, file).await?;

    Ok(Json(UploadEvidenceResponse {
        success: true,
        url,
        complaint: ComplaintView::derive(updated, Utc::now()),
        message: "Evidence uploaded and complaint marked as solved".to_string(),
    }))
}

/// POST /complaints/filter — Paginated filtered query.
async fn filter_complaints(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilterResponse>, AppError> {
    let query = extract_json(body)?.into_query()?;
    let page = query::filter_complaints(&state.complaints, &query)?;

    Ok(Json(FilterResponse {
        success: true,
        complaints: page.complaints,
        total_pages: page.total_pages,
        current_page: page.current_page,
        total_complaints: page.total_complaints,
    }))
}
