//! Ribbon grid and the aggregation pass that fills it.

use serde::Serialize;

use crate::aperture::ApertureScale;
use crate::bands::FocalBands;
use crate::color::Color;
use crate::lens::LensRange;

/// Quality tiers (rows) by focal bands (columns).
///
/// `None` marks a cell no lens painted; renderers show the background there.
/// Tiers are 1-based in the public API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RibbonGrid {
    columns: usize,
    cells: Vec<Vec<Option<Color>>>,
}

impl RibbonGrid {
    /// An all-background grid.
    pub fn blank(tiers: u32, columns: usize) -> Self {
        Self {
            columns,
            cells: vec![vec![None; columns]; tiers as usize],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Color painted at `(tier, column)`, `None` for background or out of range.
    pub fn cell(&self, tier: u32, column: usize) -> Option<Color> {
        self.row(tier)
            .and_then(|row| row.get(column))
            .copied()
            .flatten()
    }

    /// Like [`cell`](Self::cell) but substitutes `background` for unpainted cells.
    pub fn color_at(&self, tier: u32, column: usize, background: Color) -> Color {
        self.cell(tier, column).unwrap_or(background)
    }

    pub fn row(&self, tier: u32) -> Option<&[Option<Color>]> {
        let index = (tier as usize).checked_sub(1)?;
        self.cells.get(index).map(Vec::as_slice)
    }

    /// `(tier, cells)` pairs from tier 1 downwards.
    pub fn iter_rows(&self) -> impl Iterator<Item = (u32, &[Option<Color>])> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, row)| (i as u32 + 1, row.as_slice()))
    }

    pub fn painted_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    fn paint(&mut self, tier: u32, from_col: usize, to_col: usize, color: Color) {
        let Some(row) = (tier as usize)
            .checked_sub(1)
            .and_then(|index| self.cells.get_mut(index))
        else {
            return;
        };
        for cell in row.iter_mut().take(to_col.saturating_add(1)).skip(from_col) {
            *cell = Some(color);
        }
    }
}

/// Derive a fresh ribbon from a lens snapshot.
///
/// Each lens is scaled by `crop_factor` (focal lengths cut to whole
/// millimetres, then rounded up after scaling), banded and colored, then
/// paints `from_col..=to_col` in its tier. Later lenses overwrite earlier ones. A lens whose columns come out inverted, or whose
/// tier is outside `1..=tiers`, paints nothing. The crop factor is taken as
/// given; callers that want it positive validate before calling.
pub fn recompute(
    lenses: &[LensRange],
    crop_factor: f64,
    bands: &FocalBands,
    scale: &ApertureScale,
    tiers: u32,
) -> RibbonGrid {
    let mut grid = RibbonGrid::blank(tiers, bands.len());

    for lens in lenses {
        let (adj_from, adj_to, adj_aperture) = lens.adjusted(crop_factor);
        let from_col = bands.band_index_for(adj_from);
        let to_col = bands.band_index_for(adj_to);
        let color = scale.color_for(adj_aperture);

        if from_col <= to_col {
            grid.paint(lens.quality_tier, from_col, to_col, color);
        }
    }

    grid
}
