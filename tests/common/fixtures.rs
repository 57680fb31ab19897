//! Test fixtures and constants.

/// Standard colors from the aperture scale
pub mod colors {
    pub const GREEN: &str = "#00B050";
    pub const LIGHT_GREEN: &str = "#92D050";
    pub const YELLOW: &str = "#FFFF00";
    pub const ORANGE: &str = "#FFC000";
    pub const RED: &str = "#FF0000";
}

/// Lens row bodies for `PATCH /api/sessions/{id}/lenses/{lens_id}`
pub mod lenses {
    /// 24-70mm f/2.8, tier 1
    pub const STANDARD_ZOOM: &str =
        r#"{"brand":"Sigma","model":"Art","from":24,"to":70,"aperture":2.8,"quality":1}"#;

    /// 50mm f/1.2 prime, tier 2
    pub const FAST_PRIME: &str = r#"{"brand":"Canon","model":"L","from":50,"to":50,"aperture":1.2,"quality":2}"#;

    /// Everything but the aperture
    pub const MISSING_APERTURE: &str = r#"{"from":85,"to":85,"quality":1}"#;
}

/// Whole lens documents for the one-shot endpoints
pub mod documents {
    /// One zoom at crop 1.5: adjusted 36-105mm, f/4.2 (red) in tier 1
    pub const CROPPED_ZOOM: &str = r#"{
        "crop_factor": 1.5,
        "lenses": [
            {"brand": "Sigma", "model": "Art", "from": 24, "to": 70, "aperture": 2.8, "quality": 1}
        ]
    }"#;

    /// A zoom and a prime on full frame
    pub const KIT: &str = r#"{
        "crop_factor": 1.0,
        "lenses": [
            {"from": 24, "to": 70, "aperture": 2.8, "quality": 1},
            {"from": 50, "to": 50, "aperture": 1.2, "quality": 2}
        ]
    }"#;

    /// Quality tier 0 is out of range
    pub const BAD_TIER: &str = r#"{"lenses": [{"from": 24, "to": 70, "aperture": 2.8, "quality": 0}]}"#;

    /// Zero crop factor
    pub const ZERO_CROP: &str =
        r#"{"crop_factor": 0, "lenses": [{"from": 24, "to": 70, "aperture": 2.8, "quality": 1}]}"#;

    /// No lenses and no crop factor (default applies)
    pub const EMPTY: &str = r#"{}"#;
}

/// Column index of a focal length in the standard band table
pub fn column_of(focal: f64) -> usize {
    ribbon_core::FocalBands::standard().band_index_for(focal)
}
