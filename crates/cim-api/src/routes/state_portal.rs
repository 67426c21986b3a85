//! # State Portal Routes
//!
//! The state tier mirrors the municipal portal at a higher level: a state
//! official logs in against an independent credential collection and
//! views the municipality aggregates under their state.
//!
//! ## Endpoints
//!
//! - `POST /State/login` — state official login → token pair (public)
//! - `POST /State/allDistricts` — municipalities + state aggregate under a state ID

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{self, OfficialIdentity, TokenPair};
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::{AppState, MunicipalityRecord, StateRecord};

// ── Request/Response DTOs ───────────────────────────────────────────

/// State login request. Field names follow the wire contract.
#[derive(Debug, Deserialize)]
pub struct StateLoginRequest {
    #[serde(rename = "enteredUserName")]
    pub entered_user_name: String,
    #[serde(rename = "enteredPassword")]
    pub entered_password: String,
}

impl Validate for StateLoginRequest {
    fn validate(&self) -> Result<(), String> {
        if self.entered_user_name.trim().is_empty() || self.entered_password.is_empty() {
            return Err("Username and password are required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct StateLoginResponse {
    pub success: bool,
    pub user: StateRecord,
    /// The 24h access token.
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Districts-under-a-state request, keyed by the numeric `state_id`.
#[derive(Debug, Deserialize)]
pub struct StateDistrictsRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct StateDistrictsResponse {
    pub success: bool,
    pub districts: Vec<MunicipalityRecord>,
    pub state: StateRecord,
}

// ── Routers ─────────────────────────────────────────────────────────

/// Public state routes: login only.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/State/login", post(login))
}

/// Bearer-protected state routes.
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/State/allDistricts", post(all_districts))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /State/login — Authenticate a state official.
async fn login(
    State(state): State<AppState>,
    body: Result<Json<StateLoginRequest>, JsonRejection>,
) -> Result<Json<StateLoginResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let user = state
        .states
        .find(|s| s.official_username == req.entered_user_name)
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !auth::verify_password(&req.entered_password, &user.hashed_password)? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let identity = OfficialIdentity::state(
        user.official_username.clone(),
        user.state_id,
        user.state_name.clone(),
    );
    let TokenPair {
        access_token,
        refresh_token,
    } = state.auth.issue_pair(&identity)?;

    tracing::info!(username = %req.entered_user_name, "state login successful");

    Ok(Json(StateLoginResponse {
        success: true,
        user,
        token: access_token,
        refresh_token,
    }))
}

/// POST /State/allDistricts — Municipalities and the state aggregate
/// under a state ID.
async fn all_districts(
    State(state): State<AppState>,
    body: Result<Json<StateDistrictsRequest>, JsonRejection>,
) -> Result<Json<StateDistrictsResponse>, AppError> {
    let req = extract_json(body)?;

    let record = state
        .states
        .find(|s| s.state_id == req.id)
        .ok_or_else(|| AppError::NotFound("State not found".to_string()))?;

    let districts = state
        .municipalities
        .list()
        .into_iter()
        .filter(|m| m.state_id == req.id)
        .collect();

    Ok(Json(StateDistrictsResponse {
        success: true,
        districts,
        state: record,
    }))
}
