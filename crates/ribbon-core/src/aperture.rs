//! Aperture color scale
//!
//! Maps an adjusted maximum aperture (f-number) to a cell color. The first
//! threshold that is `>=` the value wins; anything slower than every
//! threshold gets the fallback color.

use serde::Serialize;

use crate::bands::{format_number, validate_ascending};
use crate::color::Color;
use crate::error::TableError;

/// One threshold of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApertureStep {
    pub threshold: f64,
    pub color: Color,
}

/// Legend entry for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Ordered threshold-to-color table with a catch-all color.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureScale {
    steps: Vec<ApertureStep>,
    fallback: Color,
}

impl ApertureScale {
    /// Build a scale, validating that thresholds are finite and strictly ascending.
    pub fn new(steps: Vec<ApertureStep>, fallback: Color) -> Result<Self, TableError> {
        if steps.is_empty() {
            return Err(TableError::EmptyScale);
        }
        let thresholds: Vec<f64> = steps.iter().map(|s| s.threshold).collect();
        validate_ascending(&thresholds)?;
        Ok(Self { steps, fallback })
    }

    /// f/1.2 green, f/1.8 light green, f/2.8 yellow, f/4.0 orange, slower red.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                ApertureStep {
                    threshold: 1.2,
                    color: Color::from_u8(0x00, 0xB0, 0x50),
                },
                ApertureStep {
                    threshold: 1.8,
                    color: Color::from_u8(0x92, 0xD0, 0x50),
                },
                ApertureStep {
                    threshold: 2.8,
                    color: Color::from_u8(0xFF, 0xFF, 0x00),
                },
                ApertureStep {
                    threshold: 4.0,
                    color: Color::from_u8(0xFF, 0xC0, 0x00),
                },
            ],
            fallback: Color::from_u8(0xFF, 0x00, 0x00),
        }
    }

    pub fn steps(&self) -> &[ApertureStep] {
        &self.steps
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }

    /// Color for an adjusted aperture.
    pub fn color_for(&self, adjusted_aperture: f64) -> Color {
        self.steps
            .iter()
            .find(|step| adjusted_aperture <= step.threshold)
            .map(|step| step.color)
            .unwrap_or(self.fallback)
    }

    /// `<= f/1.2`, ..., `> f/4.0` in scale order.
    pub fn legend(&self) -> Vec<LegendEntry> {
        let mut entries: Vec<LegendEntry> = self
            .steps
            .iter()
            .map(|step| LegendEntry {
                label: format!("≤ f/{}", format_threshold(step.threshold)),
                color: step.color,
            })
            .collect();
        if let Some(last) = self.steps.last() {
            entries.push(LegendEntry {
                label: format!("> f/{}", format_threshold(last.threshold)),
                color: self.fallback,
            });
        }
        entries
    }
}

impl Default for ApertureScale {
    fn default() -> Self {
        Self::standard()
    }
}

/// f-numbers keep one decimal (`4.0`, not `4`).
fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format_number(value)
    }
}
