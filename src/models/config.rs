use crate::assets::AssetLoader;
use ribbon_core::Color;
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Number of quality rows in the ribbon
    #[serde(default = "default_quality_tiers")]
    pub quality_tiers: u32,

    /// Crop factor a new session starts with
    #[serde(default = "default_crop_factor")]
    pub default_crop_factor: f64,

    /// Idle time after which a session is dropped
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Row labels, top to bottom (defaults to the tier numbers)
    #[serde(default)]
    pub tier_labels: Option<Vec<String>>,

    /// Ribbon drawing parameters
    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_quality_tiers() -> u32 {
    3
}

fn default_crop_factor() -> f64 {
    1.0
}

fn default_session_ttl() -> u64 {
    3600 // 1 hour
}

/// Geometry and colors of the rendered ribbon (SVG user units).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub cell_width: f64,
    pub cell_height: f64,
    /// Width of the tier label column on the left
    pub label_width: f64,
    /// Height of the focal length header row
    pub header_height: f64,
    pub caption_height: f64,
    pub legend_height: f64,
    pub padding: f64,
    /// Pixel ratio used when rasterizing
    pub scale: f32,
    pub background: Color,
    /// Fill of cells no lens covers
    pub cell_background: Color,
    pub grid_line: Color,
    pub text: Color,
    pub font_family: String,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 24.0,
            cell_height: 22.0,
            label_width: 56.0,
            header_height: 30.0,
            caption_height: 30.0,
            legend_height: 28.0,
            padding: 12.0,
            scale: 2.0,
            background: Color::WHITE,
            cell_background: Color::from_u8(0xF2, 0xF2, 0xF2),
            grid_line: Color::from_u8(0xBF, 0xBF, 0xBF),
            text: Color::from_u8(0x22, 0x22, 0x22),
            font_family: "sans-serif".to_string(),
            jpeg_quality: 90,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        quality_tiers = config.quality_tiers,
                        default_crop_factor = config.default_crop_factor,
                        session_ttl_secs = config.session_ttl_secs,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML and reject values the ribbon cannot work with.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        anyhow::ensure!(config.quality_tiers >= 1, "quality_tiers must be at least 1");
        anyhow::ensure!(
            config.default_crop_factor.is_finite() && config.default_crop_factor > 0.0,
            "default_crop_factor must be a positive number"
        );
        anyhow::ensure!(
            config.layout.scale.is_finite() && config.layout.scale > 0.0,
            "layout.scale must be a positive number"
        );
        Ok(config)
    }

    /// Label shown left of a tier row.
    pub fn tier_label(&self, tier: u32) -> String {
        (tier as usize)
            .checked_sub(1)
            .and_then(|index| self.tier_labels.as_ref()?.get(index).cloned())
            .unwrap_or_else(|| tier.to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quality_tiers: default_quality_tiers(),
            default_crop_factor: default_crop_factor(),
            session_ttl_secs: default_session_ttl(),
            tier_labels: None,
            layout: LayoutConfig::default(),
        }
    }
}
