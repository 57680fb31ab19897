use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::headers::{etag_for, HeaderMapExt};
use super::sessions::find_session;
use crate::error::ApiError;
use crate::models::ExportFormat;
use crate::services::{RenderService, RibbonService, SessionStore, SubmitStatus};

/// Header reporting whether an export recomputed the ribbon
pub const RIBBON_STATUS_HEADER: &str = "x-ribbon-status";

pub(crate) fn parse_format(format: &str) -> Result<ExportFormat, ApiError> {
    format.parse().map_err(ApiError::UnsupportedFormat)
}

/// Build an image download response, or 304 if the client already has it.
pub(crate) fn image_response(
    bytes: Vec<u8>,
    format: ExportFormat,
    request_headers: &HeaderMap,
    status: Option<SubmitStatus>,
) -> Response {
    let etag = etag_for(&bytes);

    let mut response = if request_headers.etag_matches(&etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        let disposition = format!("attachment; filename=\"{}\"", format.file_name());
        (
            [
                (header::CONTENT_TYPE, format.mime_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            bytes,
        )
            .into_response()
    };

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, value);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if let Some(status) = status {
        let value = match status {
            SubmitStatus::Recomputed => "recomputed",
            SubmitStatus::Skipped => "skipped",
        };
        headers.insert(RIBBON_STATUS_HEADER, HeaderValue::from_static(value));
    }
    response
}

/// Export the session ribbon as an image
///
/// Submits the form first. If it does not validate, the previous ribbon is
/// exported and `X-Ribbon-Status: skipped` is set.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/export/{format}",
    responses(
        (status = 200, description = "Image download", content_type = "image/png"),
        (status = 304, description = "Not modified (ETag match)"),
        (status = 400, description = "Unsupported format"),
        (status = 404, description = "Session not found"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ("format" = String, Path, description = "jpg, png or webp"),
        ("If-None-Match" = Option<String>, Header, description = "ETag from a previous export"),
    ),
    tag = "Ribbon"
)]
pub async fn export_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(ribbons): State<Arc<RibbonService>>,
    State(renderer): State<Arc<RenderService>>,
    Path((id, format)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let format = parse_format(&format)?;
    let handle = find_session(store.as_ref(), &id).await?;

    let outcome = {
        let mut session = handle.write().await;
        ribbons.submit(&mut session)
    };

    let bytes = renderer
        .export(&outcome.ribbon, ribbons.tables(), format)
        .await?;

    tracing::info!(
        session = %id,
        %format,
        status = ?outcome.status,
        size = bytes.len(),
        "Ribbon exported"
    );

    Ok(image_response(bytes, format, &headers, Some(outcome.status)))
}

/// Get the session's current ribbon as SVG
///
/// Does not submit; shows the ribbon currently in effect.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/ribbon.svg",
    responses(
        (status = 200, description = "SVG document", content_type = "image/svg+xml"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Ribbon"
)]
pub async fn session_svg<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(ribbons): State<Arc<RibbonService>>,
    State(renderer): State<Arc<RenderService>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let handle = find_session(store.as_ref(), &id).await?;
    let ribbon = {
        let mut session = handle.write().await;
        session.touch();
        ribbons.current(&session)
    };

    let svg = renderer.render_svg(&ribbon, ribbons.tables())?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
