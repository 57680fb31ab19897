use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use ribbon_core::{AddedLens, LensField, LensId, LensPatch, LensRow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::extract::{ApiJson, OptionalJson};
use crate::error::ApiError;
use crate::models::{Ribbon, Session, SessionId};
use crate::services::{RibbonService, SessionHandle, SessionStore, SubmitOutcome};

/// A session's form and the ribbon currently in effect
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Session identifier used in all other session routes
    pub id: String,
    /// Crop factor field as entered (may be empty)
    pub crop_factor: Option<f64>,
    /// Lens rows in form order
    #[schema(value_type = Vec<Object>)]
    pub lenses: Vec<LensRow>,
    /// Number of quality rows
    pub quality_tiers: u32,
    /// Whether a valid recompute has happened yet
    pub computed: bool,
    #[schema(value_type = Object)]
    pub ribbon: Ribbon,
}

impl SessionResponse {
    fn new(session: &Session, ribbons: &RibbonService) -> Self {
        Self {
            id: session.id.to_string(),
            crop_factor: session.form.crop_factor(),
            lenses: session.form.rows().to_vec(),
            quality_tiers: ribbons.tiers(),
            computed: session.ribbon.is_some(),
            ribbon: ribbons.current(session),
        }
    }
}

/// Request body for setting the crop factor
#[derive(Debug, Deserialize, ToSchema)]
pub struct CropFactorRequest {
    /// New value; `null` empties the field
    pub crop_factor: Option<f64>,
}

/// Request body for adding a lens row
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddLensRequest {
    /// Field that receives focus on the new row (default `from`)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub focus: Option<LensField>,
}

/// Added row and the field that receives focus
#[derive(Debug, Serialize, ToSchema)]
pub struct AddedLensResponse {
    pub id: u64,
    #[schema(value_type = String)]
    pub focus: LensField,
}

impl From<AddedLens> for AddedLensResponse {
    fn from(added: AddedLens) -> Self {
        Self {
            id: added.id.0,
            focus: added.focus,
        }
    }
}

pub(crate) async fn find_session<S: SessionStore>(
    store: &S,
    id: &str,
) -> Result<SessionHandle, ApiError> {
    store
        .find(&SessionId::new(id))
        .await?
        .ok_or(ApiError::SessionNotFound)
}

/// Create a session
///
/// Starts with an empty form and the configured default crop factor.
/// Idle sessions are evicted first.
#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
    ),
    tag = "Sessions"
)]
pub async fn create_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(ribbons): State<Arc<RibbonService>>,
) -> Result<impl IntoResponse, ApiError> {
    let ttl = chrono::Duration::seconds(ribbons.config().session_ttl_secs as i64);
    let evicted = store.evict_idle(ttl).await?;
    if evicted > 0 {
        tracing::info!(evicted, "Evicted idle sessions");
    }

    let handle = store.create(ribbons.new_form()).await?;
    let session = handle.read().await;
    let total = store.len().await;

    tracing::info!(session = %session.id, total, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new(&session, &ribbons)),
    ))
}

/// Get a session's form and current ribbon
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Sessions"
)]
pub async fn get_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(ribbons): State<Arc<RibbonService>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    session.touch();
    Ok(Json(SessionResponse::new(&session, &ribbons)))
}

/// Delete a session
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Sessions"
)]
pub async fn delete_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if store.remove(&SessionId::new(&id)).await? {
        tracing::info!(session = %id, "Session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

/// Set the crop factor field
///
/// The value is stored as entered; it is validated on the next submit.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/crop-factor",
    request_body = CropFactorRequest,
    responses(
        (status = 200, description = "Updated session", body = SessionResponse),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Sessions"
)]
pub async fn set_crop_factor<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(ribbons): State<Arc<RibbonService>>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CropFactorRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    session.touch();
    session.form.set_crop_factor(request.crop_factor);

    tracing::debug!(session = %id, crop_factor = ?request.crop_factor, "Crop factor set");
    Ok(Json(SessionResponse::new(&session, &ribbons)))
}

/// Add a blank lens row
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/lenses",
    request_body(content = AddLensRequest, description = "Optional; focus defaults to from"),
    responses(
        (status = 201, description = "Row added", body = AddedLensResponse),
        (status = 400, description = "Malformed body or unknown field"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Lenses"
)]
pub async fn add_lens<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    OptionalJson(request): OptionalJson<AddLensRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let focus = request
        .and_then(|request| request.focus)
        .unwrap_or(LensField::From);

    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    session.touch();
    let added = session.form.add_lens(focus);

    tracing::debug!(session = %id, lens = %added.id, focus = %added.focus, "Lens row added");
    Ok((StatusCode::CREATED, Json(AddedLensResponse::from(added))))
}

/// Focus a field of the trigger row
///
/// Adds a new row and moves focus to the same field on it.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/triggers/{field}",
    responses(
        (status = 201, description = "Row added", body = AddedLensResponse),
        (status = 400, description = "Unknown field"),
        (status = 404, description = "Session not found"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ("field" = String, Path, description = "brand, model, from, to, aperture or quality"),
    ),
    tag = "Lenses"
)]
pub async fn trigger_focus<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path((id, field)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let field: LensField = field.parse().map_err(ApiError::BadRequest)?;

    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    session.touch();
    let added = session.form.on_trigger_focus(field);

    tracing::debug!(session = %id, lens = %added.id, focus = %field, "Trigger row focused");
    Ok((StatusCode::CREATED, Json(AddedLensResponse::from(added))))
}

/// Set or clear fields of a lens row
///
/// Body keys: `brand`, `model`, `from`, `to`, `aperture`, `quality`.
/// A missing key leaves the field alone, `null` clears it.
#[utoipa::path(
    patch,
    path = "/api/sessions/{id}/lenses/{lens_id}",
    responses(
        (status = 200, description = "Updated row"),
        (status = 404, description = "Session or lens not found"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ("lens_id" = u64, Path, description = "Lens row ID"),
    ),
    tag = "Lenses"
)]
pub async fn update_lens<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path((id, lens_id)): Path<(String, u64)>,
    ApiJson(patch): ApiJson<LensPatch>,
) -> Result<Json<LensRow>, ApiError> {
    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    session.touch();
    let row = session
        .form
        .update_lens(LensId(lens_id), patch)
        .ok_or(ApiError::LensNotFound)?;
    Ok(Json(row.clone()))
}

/// Remove a lens row
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/lenses/{lens_id}",
    responses(
        (status = 204, description = "Row removed"),
        (status = 404, description = "Session or lens not found"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ("lens_id" = u64, Path, description = "Lens row ID"),
    ),
    tag = "Lenses"
)]
pub async fn remove_lens<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path((id, lens_id)): Path<(String, u64)>,
) -> Result<StatusCode, ApiError> {
    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    session.touch();
    session
        .form
        .remove_lens(LensId(lens_id))
        .ok_or(ApiError::LensNotFound)?;

    tracing::debug!(session = %id, lens = lens_id, remaining = session.form.len(), "Lens row removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Submit the form
///
/// Recomputes the ribbon if every field validates. Otherwise the previous
/// ribbon is kept and the issues are reported; this is not an error.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/submit",
    responses(
        (status = 200, description = "Recomputed or skipped", body = SubmitOutcome),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Ribbon"
)]
pub async fn submit<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(ribbons): State<Arc<RibbonService>>,
    Path(id): Path<String>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let handle = find_session(store.as_ref(), &id).await?;
    let mut session = handle.write().await;
    Ok(Json(ribbons.submit(&mut session)))
}
