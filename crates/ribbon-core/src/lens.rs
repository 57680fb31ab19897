//! Validated lens range records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row identifier, unique within one form and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LensId(pub u64);

impl fmt::Display for LensId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete lens entry as consumed by the aggregator.
///
/// Focal lengths are in millimetres on the lens's native format;
/// `quality_tier` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensRange {
    pub id: LensId,
    pub from_focal: f64,
    pub to_focal: f64,
    pub aperture: f64,
    pub quality_tier: u32,
}

impl LensRange {
    /// `(ceil(trunc(from) * crop), ceil(trunc(to) * crop), aperture * crop)`
    ///
    /// Focal lengths count in whole millimetres; fractions are dropped
    /// before the crop factor applies. The aperture keeps its fraction.
    pub fn adjusted(&self, crop_factor: f64) -> (f64, f64, f64) {
        (
            (self.from_focal.trunc() * crop_factor).ceil(),
            (self.to_focal.trunc() * crop_factor).ceil(),
            self.aperture * crop_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_rounds_focal_up() {
        let lens = LensRange {
            id: LensId(0),
            from_focal: 24.0,
            to_focal: 70.0,
            aperture: 2.8,
            quality_tier: 1,
        };
        let (from, to, aperture) = lens.adjusted(1.5);
        assert_eq!(from, 36.0);
        assert_eq!(to, 105.0);
        assert!((aperture - 4.2).abs() < 1e-9);

        let (from, to, _) = lens.adjusted(1.53);
        assert_eq!(from, 37.0);
        assert_eq!(to, 108.0);
    }

    #[test]
    fn test_adjusted_drops_focal_fraction() {
        let lens = LensRange {
            id: LensId(0),
            from_focal: 17.5,
            to_focal: 17.9,
            aperture: 2.8,
            quality_tier: 1,
        };
        assert_eq!(lens.adjusted(1.0), (17.0, 17.0, 2.8));

        let (from, to, aperture) = lens.adjusted(1.5);
        assert_eq!((from, to), (26.0, 26.0));
        assert!((aperture - 4.2).abs() < 1e-9);
    }
}
