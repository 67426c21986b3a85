//! # Municipal Portal Routes
//!
//! ## Endpoints
//!
//! - `POST /municipalities/login` — official login → token pair (public)
//! - `GET /municipalities/categories` — static category catalog (public)
//! - `GET /municipalities/allDistricts` — list all municipality aggregates
//! - `POST /municipalities/fetchDistrict` — fetch one municipality by numeric ID
//! - `POST /municipalities/fetchByName` — complaints for a municipality by name

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{self, OfficialIdentity, TokenPair};
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::query::ComplaintView;
use crate::state::{AppState, MunicipalityRecord};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Municipal login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Username and password are required".to_string());
        }
        Ok(())
    }
}

/// Successful login response: the official's aggregate plus both tokens.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: MunicipalityRecord,
    /// The 24h access token.
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: &'static [cim_core::Category],
}

#[derive(Debug, Serialize)]
pub struct DistrictsResponse {
    pub success: bool,
    pub districts: Vec<MunicipalityRecord>,
}

/// Fetch-one-district request, keyed by the numeric `district_id`.
#[derive(Debug, Deserialize)]
pub struct FetchDistrictRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DistrictResponse {
    pub success: bool,
    pub district: MunicipalityRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchByNameRequest {
    pub municipality_name: String,
}

impl Validate for FetchByNameRequest {
    fn validate(&self) -> Result<(), String> {
        if self.municipality_name.trim().is_empty() {
            return Err("municipalityName is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ComplaintsResponse {
    pub success: bool,
    pub complaints: Vec<ComplaintView>,
}

// ── Routers ─────────────────────────────────────────────────────────

/// Public municipal routes: login and the category catalog.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/municipalities/login", post(login))
        .route("/municipalities/categories", get(categories))
}

/// Bearer-protected municipal routes.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/municipalities/allDistricts", get(all_districts))
        .route("/municipalities/fetchDistrict", post(fetch_district))
        .route("/municipalities/fetchByName", post(fetch_by_name))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /municipalities/login — Authenticate a municipal official.
///
/// Unknown username and wrong password are both 401s; the message
/// differs but neither leaks which credential store matched.
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let user = state
        .municipalities
        .find(|m| m.official_username == req.username)
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !auth::verify_password(&req.password, &user.hashed_password)? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let identity = OfficialIdentity::municipal(
        user.official_username.clone(),
        user.district_id,
        user.district_name.clone(),
    );
    let TokenPair {
        access_token,
        refresh_token,
    } = state.auth.issue_pair(&identity)?;

    tracing::info!(username = %req.username, "municipal login successful");

    Ok(Json(LoginResponse {
        success: true,
        user,
        token: access_token,
        refresh_token,
    }))
}

/// GET /municipalities/categories — The static category catalog.
async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        success: true,
        categories: cim_core::catalog(),
    })
}

/// GET /municipalities/allDistricts — List all municipality aggregates.
async fn all_districts(State(state): State<AppState>) -> Json<DistrictsResponse> {
    Json(DistrictsResponse {
        success: true,
        districts: state.municipalities.list(),
    })
}

/// POST /municipalities/fetchDistrict — One municipality by numeric ID.
async fn fetch_district(
    State(state): State<AppState>,
    body: Result<Json<FetchDistrictRequest>, JsonRejection>,
) -> Result<Json<DistrictResponse>, AppError> {
    let req = extract_json(body)?;
    state
        .municipalities
        .find(|m| m.district_id == req.id)
        .map(|district| {
            Json(DistrictResponse {
                success: true,
                district,
            })
        })
        .ok_or_else(|| AppError::NotFound("District not found".to_string()))
}

/// POST /municipalities/fetchByName — All complaints for a municipality.
async fn fetch_by_name(
    State(state): State<AppState>,
    body: Result<Json<FetchByNameRequest>, JsonRejection>,
) -> Result<Json<ComplaintsResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let now = Utc::now();
    let complaints = state
        .complaints
        .list()
        .into_iter()
        .filter(|c| c.municipality_name == req.municipality_name)
        .map(|c| ComplaintView::derive(c, now))
        .collect();

    Ok(Json(ComplaintsResponse {
        success: true,
        complaints,
    }))
}
