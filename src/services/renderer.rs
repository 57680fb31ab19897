use std::sync::Arc;

use crate::assets::AssetLoader;
use crate::error::RenderError;
use crate::models::{AppConfig, ExportFormat, Ribbon};
use crate::rendering::{RasterOptions, SvgRenderer};
use crate::services::{RibbonTables, TemplateService};

/// Turns ribbons into SVG documents and raster exports
pub struct RenderService {
    templates: TemplateService,
    svg_renderer: Arc<SvgRenderer>,
    options: RasterOptions,
}

impl RenderService {
    pub fn new(assets: Arc<AssetLoader>, config: Arc<AppConfig>) -> Self {
        let svg_renderer = Arc::new(SvgRenderer::with_fonts(assets.get_fonts()));
        let options = RasterOptions {
            scale: config.layout.scale,
            background: config.layout.background,
            jpeg_quality: config.layout.jpeg_quality,
        };
        Self {
            templates: TemplateService::new(assets, config),
            svg_renderer,
            options,
        }
    }

    pub fn render_svg(
        &self,
        ribbon: &Ribbon,
        tables: &RibbonTables,
    ) -> Result<String, RenderError> {
        self.templates
            .render_ribbon(ribbon, &tables.bands, &tables.scale)
    }

    /// Render and encode on the calling thread.
    pub fn render_image(
        &self,
        ribbon: &Ribbon,
        tables: &RibbonTables,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RenderError> {
        let svg = self.render_svg(ribbon, tables)?;
        self.svg_renderer.render(svg.as_bytes(), format, &self.options)
    }

    /// Render an export image
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime during
    /// rasterization and encoding.
    pub async fn export(
        &self,
        ribbon: &Ribbon,
        tables: &RibbonTables,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RenderError> {
        let svg = self.render_svg(ribbon, tables)?;
        let renderer = self.svg_renderer.clone();
        let options = self.options;

        tokio::task::spawn_blocking(move || renderer.render(svg.as_bytes(), format, &options))
            .await
            .map_err(|e| {
                RenderError::Io(std::io::Error::other(format!("Render task failed: {e}")))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RibbonService;
    use ribbon_core::{LensDraft, LensForm};

    #[tokio::test]
    async fn test_export_png() {
        let config = Arc::new(AppConfig::default());
        let ribbons = RibbonService::new(config.clone());
        let renderer = RenderService::new(Arc::new(AssetLoader::new(None, None, None)), config);

        let mut form = LensForm::new(Some(1.0));
        form.push_draft(LensDraft {
            from: Some(50.0),
            to: Some(50.0),
            aperture: Some(1.2),
            quality: Some(2),
            ..Default::default()
        });
        let ribbon = ribbons.compute(&form).unwrap();

        let bytes = renderer
            .export(&ribbon, ribbons.tables(), ExportFormat::Png)
            .await
            .unwrap();
        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).unwrap();
        // 968x178 user units at scale 2
        assert_eq!((img.width(), img.height()), (1936, 356));
    }
}
