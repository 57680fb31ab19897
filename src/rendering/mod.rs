pub mod encode;
pub mod svg_renderer;

pub use svg_renderer::{RasterOptions, SvgRenderer};
