//! Focal-length band table
//!
//! Breakpoints define the ribbon columns. Column `i` covers
//! `breakpoint[i-1] < x <= breakpoint[i]`; values at or below the first
//! breakpoint land in column 0 and values above the last one saturate into
//! the last column.

use crate::error::TableError;

/// Standard breakpoints in millimetres, one per ribbon column.
pub const STANDARD_FOCAL_LENGTHS: [f64; 37] = [
    10.0, 12.0, 14.0, 16.0, 17.0, 18.0, 20.0, 21.0, 24.0, 28.0, 30.0, 35.0, 40.0, 45.0, 50.0,
    55.0, 56.0, 58.0, 60.0, 70.0, 75.0, 80.0, 85.0, 90.0, 100.0, 105.0, 120.0, 135.0, 150.0,
    180.0, 200.0, 210.0, 250.0, 300.0, 400.0, 500.0, 600.0,
];

/// Ordered focal-length breakpoints.
///
/// Invariant: at least two finite, strictly ascending values.
#[derive(Debug, Clone, PartialEq)]
pub struct FocalBands {
    breakpoints: Vec<f64>,
}

impl FocalBands {
    /// Build a band table, validating the breakpoint invariant.
    pub fn new(breakpoints: Vec<f64>) -> Result<Self, TableError> {
        if breakpoints.len() < 2 {
            return Err(TableError::TooFewBreakpoints {
                count: breakpoints.len(),
            });
        }
        validate_ascending(&breakpoints)?;
        Ok(Self { breakpoints })
    }

    /// The 37-column table used by the ribbon.
    pub fn standard() -> Self {
        Self {
            breakpoints: STANDARD_FOCAL_LENGTHS.to_vec(),
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Column for an adjusted focal length.
    ///
    /// Returns the index of the first breakpoint `>=` the input, or the last
    /// column when the input exceeds every breakpoint (NaN included).
    pub fn band_index_for(&self, adjusted_focal: f64) -> usize {
        self.breakpoints
            .iter()
            .position(|&bp| adjusted_focal <= bp)
            .unwrap_or(self.breakpoints.len() - 1)
    }

    /// Header label: `<10` for the first column, `600+` for the last.
    pub fn column_label(&self, column: usize) -> String {
        let Some(&value) = self.breakpoints.get(column) else {
            return String::new();
        };
        let text = format_number(value);
        if column == 0 {
            format!("<{text}")
        } else if column == self.breakpoints.len() - 1 {
            format!("{text}+")
        } else {
            text
        }
    }

    /// All header labels in column order.
    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.column_label(i)).collect()
    }
}

impl Default for FocalBands {
    fn default() -> Self {
        Self::standard()
    }
}

/// Check that values are finite and strictly ascending.
pub(crate) fn validate_ascending(values: &[f64]) -> Result<(), TableError> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(TableError::NotFinite { index });
        }
        if index > 0 && value <= values[index - 1] {
            return Err(TableError::NotAscending { index });
        }
    }
    Ok(())
}

/// Format without a trailing `.0` for whole numbers.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
