//! One-shot endpoints: a whole lens document in, a ribbon out.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Json, Response},
};
use std::sync::Arc;

use super::export::{image_response, parse_format};
use super::extract::ApiJson;
use crate::error::ApiError;
use crate::models::{LensDocument, Ribbon};
use crate::services::{RenderService, RibbonService};

fn compute_document(ribbons: &RibbonService, document: LensDocument) -> Result<Ribbon, ApiError> {
    let lenses = document.lenses.len();
    let form = document.into_form(ribbons.config().default_crop_factor);
    let ribbon = ribbons
        .compute(&form)
        .map_err(|errors| ApiError::BadRequest(errors.to_string()))?;

    tracing::debug!(
        lenses,
        crop_factor = ribbon.crop_factor,
        painted = ribbon.grid.painted_cells(),
        "Document ribbon computed"
    );
    Ok(ribbon)
}

/// Compute a ribbon grid from a lens document
#[utoipa::path(
    post,
    path = "/api/ribbon",
    request_body = LensDocument,
    responses(
        (status = 200, description = "Ribbon grid"),
        (status = 400, description = "Invalid document"),
    ),
    tag = "Ribbon"
)]
pub async fn compute_ribbon(
    State(ribbons): State<Arc<RibbonService>>,
    ApiJson(document): ApiJson<LensDocument>,
) -> Result<Json<Ribbon>, ApiError> {
    compute_document(&ribbons, document).map(Json)
}

/// Render a lens document straight to an image
#[utoipa::path(
    post,
    path = "/api/ribbon/export/{format}",
    request_body = LensDocument,
    responses(
        (status = 200, description = "Image download", content_type = "image/png"),
        (status = 304, description = "Not modified (ETag match)"),
        (status = 400, description = "Invalid document or unsupported format"),
    ),
    params(
        ("format" = String, Path, description = "jpg, png or webp"),
        ("If-None-Match" = Option<String>, Header, description = "ETag from a previous export"),
    ),
    tag = "Ribbon"
)]
pub async fn export_ribbon(
    State(ribbons): State<Arc<RibbonService>>,
    State(renderer): State<Arc<RenderService>>,
    Path(format): Path<String>,
    headers: HeaderMap,
    ApiJson(document): ApiJson<LensDocument>,
) -> Result<Response, ApiError> {
    let format = parse_format(&format)?;
    let ribbon = compute_document(&ribbons, document)?;
    let bytes = renderer.export(&ribbon, ribbons.tables(), format).await?;

    tracing::info!(%format, size = bytes.len(), "Document ribbon exported");
    Ok(image_response(bytes, format, &headers, None))
}
