//! ribbon-core: lens compatibility ribbons
//!
//! A ribbon is a grid whose columns are focal-length bands and whose rows are
//! quality tiers. Each cell is colored by the widest crop-adjusted aperture a
//! lens offers at that focal length, aggregated over every lens in a form.
//!
//! # Quick Start
//!
//! ```
//! use ribbon_core::{recompute, ApertureScale, FocalBands, LensDraft, LensForm};
//!
//! let mut form = LensForm::new(Some(1.5));
//! form.push_draft(LensDraft {
//!     from: Some(24.0),
//!     to: Some(70.0),
//!     aperture: Some(2.8),
//!     quality: Some(1),
//!     ..Default::default()
//! });
//!
//! let snapshot = form.snapshot(3).unwrap();
//! let bands = FocalBands::standard();
//! let grid = recompute(
//!     &snapshot.lenses,
//!     snapshot.crop_factor,
//!     &bands,
//!     &ApertureScale::standard(),
//!     3,
//! );
//!
//! // 24-70mm at 1.5x covers 36-105mm, f/2.8 becomes f/4.2 (red)
//! assert_eq!(grid.cell(1, bands.band_index_for(40.0)).unwrap().to_hex(), "#FF0000");
//! ```
//!
//! # Pieces
//!
//! - [`FocalBands`] and [`ApertureScale`]: the static band table and color scale
//! - [`LensForm`]: the editable, ordered set of lens rows (the lens registry)
//! - [`recompute`]: pure aggregation from a [`FormSnapshot`] into a [`RibbonGrid`]
//!
//! Nothing here performs I/O; rendering and export live in the server crate.

pub mod aperture;
pub mod bands;
pub mod color;
pub mod error;
pub mod form;
pub mod grid;
pub mod lens;


pub use aperture::{ApertureScale, ApertureStep, LegendEntry};
pub use bands::{FocalBands, STANDARD_FOCAL_LENGTHS};
pub use color::Color;
pub use error::{FormErrors, FormField, FormIssue, IssueKind, ParseColorError, TableError};
pub use form::{AddedLens, FormSnapshot, LensDraft, LensField, LensForm, LensPatch, LensRow};
pub use grid::{recompute, RibbonGrid};
pub use lens::{LensId, LensRange};
