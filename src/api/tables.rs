use axum::{extract::State, response::Json};
use ribbon_core::LegendEntry;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::RibbonService;

/// The band table, aperture scale and quality rows a ribbon is drawn with
#[derive(Debug, Serialize, ToSchema)]
pub struct TablesResponse {
    /// Number of quality rows
    pub quality_tiers: u32,
    /// Row label for each tier, top row first
    pub tier_labels: Vec<String>,
    /// Focal band breakpoints in mm
    pub breakpoints: Vec<f64>,
    /// Column header for each band
    pub labels: Vec<String>,
    /// Aperture legend, brightest first
    #[schema(value_type = Vec<Object>)]
    pub legend: Vec<LegendEntry>,
}

/// Get the static ribbon tables
#[utoipa::path(
    get,
    path = "/api/tables",
    responses(
        (status = 200, description = "Band table and aperture legend", body = TablesResponse),
    ),
    tag = "Ribbon"
)]
pub async fn get_tables(State(ribbons): State<Arc<RibbonService>>) -> Json<TablesResponse> {
    let tables = ribbons.tables();
    let tiers = ribbons.tiers();
    Json(TablesResponse {
        quality_tiers: tiers,
        tier_labels: (1..=tiers)
            .map(|tier| ribbons.config().tier_label(tier))
            .collect(),
        breakpoints: tables.bands.breakpoints().to_vec(),
        labels: tables.bands.labels(),
        legend: tables.scale.legend(),
    })
}
