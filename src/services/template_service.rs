//! SVG rendering of a ribbon through the `ribbon.svg` Tera template.
//!
//! All geometry is computed here; the template only places what it is given.

use ribbon_core::{ApertureScale, Color, FocalBands, RibbonGrid};
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::assets::AssetLoader;
use crate::error::RenderError;
use crate::models::{AppConfig, LayoutConfig, Ribbon};

pub const RIBBON_TEMPLATE: &str = "ribbon.svg";

const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_SPACING: f64 = 84.0;

/// Service for rendering ribbons to SVG with Tera
pub struct TemplateService {
    assets: Arc<AssetLoader>,
    config: Arc<AppConfig>,
}

impl TemplateService {
    pub fn new(assets: Arc<AssetLoader>, config: Arc<AppConfig>) -> Self {
        tracing::info!(
            templates = assets.list_templates().len(),
            "Template service initialized"
        );
        Self { assets, config }
    }

    /// Render a ribbon as an SVG document.
    ///
    /// The template is read on every call so an external `TEMPLATES_DIR` can
    /// be edited while the server runs.
    pub fn render_ribbon(
        &self,
        ribbon: &Ribbon,
        bands: &FocalBands,
        scale: &ApertureScale,
    ) -> Result<String, RenderError> {
        let template = self.assets.read_template_string(RIBBON_TEMPLATE)?;

        let mut tera = Tera::default();
        tera.add_raw_template(RIBBON_TEMPLATE, &template)?;

        let view = RibbonView::build(ribbon, bands, scale, &self.config);
        let context = Context::from_serialize(&view)?;
        let svg = tera.render(RIBBON_TEMPLATE, &context)?;

        tracing::debug!(
            width = view.width,
            height = view.height,
            bytes = svg.len(),
            "Rendered ribbon SVG"
        );
        Ok(svg)
    }
}

#[derive(Debug, Serialize)]
struct RibbonView {
    width: f64,
    height: f64,
    background: Color,
    text_color: Color,
    grid_line: Color,
    font_family: String,
    cell_width: f64,
    cell_height: f64,
    caption: Caption,
    headers: Vec<Header>,
    rows: Vec<RowView>,
    legend: Vec<LegendView>,
}

#[derive(Debug, Serialize)]
struct Caption {
    x: f64,
    y: f64,
    text: String,
}

#[derive(Debug, Serialize)]
struct Header {
    x: f64,
    y: f64,
    label: String,
}

#[derive(Debug, Serialize)]
struct RowView {
    label: String,
    label_x: f64,
    label_y: f64,
    cells: Vec<CellView>,
}

#[derive(Debug, Serialize)]
struct CellView {
    x: f64,
    y: f64,
    fill: Color,
}

#[derive(Debug, Serialize)]
struct LegendView {
    x: f64,
    y: f64,
    size: f64,
    fill: Color,
    label: String,
    label_x: f64,
    label_y: f64,
}

impl RibbonView {
    fn build(
        ribbon: &Ribbon,
        bands: &FocalBands,
        scale: &ApertureScale,
        config: &AppConfig,
    ) -> Self {
        let layout: &LayoutConfig = &config.layout;
        let grid: &RibbonGrid = &ribbon.grid;
        let columns = grid.columns() as f64;
        let tiers = grid.rows() as f64;

        let grid_x = layout.padding + layout.label_width;
        let grid_y = layout.padding + layout.caption_height + layout.header_height;
        let legend_entries = scale.legend();

        let legend_width = LEGEND_SPACING * legend_entries.len() as f64;
        let width = (grid_x + columns * layout.cell_width).max(grid_x + legend_width)
            + layout.padding;
        let height = grid_y + tiers * layout.cell_height + layout.legend_height + layout.padding;

        let caption = Caption {
            x: layout.padding,
            y: layout.padding + layout.caption_height * 0.6,
            text: format!("Crop factor: {}", ribbon.crop_factor),
        };

        let headers = bands
            .labels()
            .into_iter()
            .enumerate()
            .map(|(column, label)| Header {
                x: grid_x + (column as f64 + 0.5) * layout.cell_width,
                y: grid_y - 8.0,
                label,
            })
            .collect();

        let rows = grid
            .iter_rows()
            .map(|(tier, cells)| {
                let y = grid_y + f64::from(tier - 1) * layout.cell_height;
                RowView {
                    label: config.tier_label(tier),
                    label_x: grid_x - 6.0,
                    label_y: y + layout.cell_height / 2.0 + 4.0,
                    cells: cells
                        .iter()
                        .enumerate()
                        .map(|(column, cell)| CellView {
                            x: grid_x + column as f64 * layout.cell_width,
                            y,
                            fill: cell.unwrap_or(layout.cell_background),
                        })
                        .collect(),
                }
            })
            .collect();

        let legend_y =
            grid_y + tiers * layout.cell_height + (layout.legend_height - LEGEND_SWATCH) / 2.0;
        let legend = legend_entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let x = grid_x + i as f64 * LEGEND_SPACING;
                LegendView {
                    x,
                    y: legend_y,
                    size: LEGEND_SWATCH,
                    fill: entry.color,
                    label: entry.label,
                    label_x: x + LEGEND_SWATCH + 4.0,
                    label_y: legend_y + LEGEND_SWATCH - 2.0,
                }
            })
            .collect();

        Self {
            width,
            height,
            background: layout.background,
            text_color: layout.text,
            grid_line: layout.grid_line,
            font_family: layout.font_family.clone(),
            cell_width: layout.cell_width,
            cell_height: layout.cell_height,
            caption,
            headers,
            rows,
            legend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ribbon_core::{recompute, LensId, LensRange};

    fn service() -> TemplateService {
        TemplateService::new(
            Arc::new(AssetLoader::new(None, None, None)),
            Arc::new(AppConfig::default()),
        )
    }

    fn sample_ribbon() -> Ribbon {
        let lens = LensRange {
            id: LensId(0),
            from_focal: 24.0,
            to_focal: 70.0,
            aperture: 2.8,
            quality_tier: 1,
        };
        Ribbon {
            grid: recompute(
                &[lens],
                1.5,
                &FocalBands::standard(),
                &ApertureScale::standard(),
                3,
            ),
            crop_factor: 1.5,
        }
    }

    #[test]
    fn test_render_contains_caption_and_cells() {
        let svg = service()
            .render_ribbon(
                &sample_ribbon(),
                &FocalBands::standard(),
                &ApertureScale::standard(),
            )
            .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Crop factor: 1.5"));
        assert_eq!(svg.matches("fill=\"#FF0000\"").count(), 14 + 1);
        assert_eq!(svg.matches("fill=\"#F2F2F2\"").count(), 3 * 37 - 14);
    }

    #[test]
    fn test_labels_are_escaped() {
        let svg = service()
            .render_ribbon(
                &sample_ribbon(),
                &FocalBands::standard(),
                &ApertureScale::standard(),
            )
            .unwrap();

        assert!(svg.contains("&lt;10"));
        assert!(!svg.contains(">< f/"));
        assert!(!svg.contains("><10<"));
    }

    #[test]
    fn test_svg_parses() {
        let svg = service()
            .render_ribbon(
                &sample_ribbon(),
                &FocalBands::standard(),
                &ApertureScale::standard(),
            )
            .unwrap();
        let options = resvg::usvg::Options::default();
        let tree = resvg::usvg::Tree::from_str(&svg, &options).unwrap();
        assert!(tree.size().width() > 37.0 * 24.0);
    }

    #[test]
    fn test_view_geometry() {
        let config = AppConfig::default();
        let view = RibbonView::build(
            &sample_ribbon(),
            &FocalBands::standard(),
            &ApertureScale::standard(),
            &config,
        );
        // 12 + 56 + 37 * 24 + 12
        assert_eq!(view.width, 968.0);
        // 12 + 30 + 30 + 3 * 22 + 28 + 12
        assert_eq!(view.height, 178.0);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[0].label, "1");
        assert_eq!(view.headers.len(), 37);
        assert_eq!(view.legend.len(), 5);
    }
}
