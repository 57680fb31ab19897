//! Lens Ribbon
//!
//! HTTP service and CLI that turn a camera lens collection into a ribbon
//! image: focal-length bands across, quality tiers down, cells colored by the
//! fastest crop-adjusted aperture available. The pure ribbon logic lives in
//! the `ribbon-core` crate; this library exposes modules for integration
//! testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
