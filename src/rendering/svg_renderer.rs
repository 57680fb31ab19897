use resvg::usvg::{self, Transform};
use ribbon_core::Color;
use std::sync::Arc;
use tiny_skia::Pixmap;

use crate::error::RenderError;
use crate::models::ExportFormat;
use crate::rendering::encode::{encode_jpeg, encode_png, encode_webp, flatten_rgb};

/// Rasterizes ribbon SVGs and encodes them into the export formats.
pub struct SvgRenderer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

/// Encoder settings that come from the layout config.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Pixel ratio applied to the SVG's own size
    pub scale: f32,
    /// Color behind transparent pixels
    pub background: Color,
    pub jpeg_quality: u8,
}

impl SvgRenderer {
    /// Create a new SVG renderer with extra fonts on top of the system fonts
    pub fn with_fonts(fonts: Vec<(String, Vec<u8>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data);
            tracing::debug!(font = %name, "Loaded font");
        }

        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a new SVG renderer with system fonts only
    pub fn new() -> Self {
        Self::with_fonts(Vec::new())
    }

    /// Rasterize and encode an SVG document.
    pub fn render(
        &self,
        svg_data: &[u8],
        format: ExportFormat,
        options: &RasterOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.rasterize_svg(svg_data, options.scale)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        let rgb = flatten_rgb(&pixmap, options.background);

        let bytes = match format {
            ExportFormat::Png => encode_png(&rgb, width, height)?,
            ExportFormat::Jpg => encode_jpeg(&rgb, width, height, options.jpeg_quality)?,
            ExportFormat::Webp => encode_webp(&rgb, width, height)?,
        };

        tracing::debug!(
            format = %format,
            width,
            height,
            bytes = bytes.len(),
            "Encoded ribbon image"
        );
        Ok(bytes)
    }

    /// Parse and rasterize SVG to an RGBA pixmap at `scale` times its size
    fn rasterize_svg(&self, svg_data: &[u8], scale: f32) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
        resvg::render(
            &tree,
            Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}
