//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::FromRef,
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::services::{InMemorySessionStore, RenderService, RibbonService};

type Store = InMemorySessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Store>,
    pub ribbons: Arc<RibbonService>,
    pub renderer: Arc<RenderService>,
}

impl FromRef<AppState> for Arc<Store> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<RibbonService> {
    fn from_ref(state: &AppState) -> Self {
        state.ribbons.clone()
    }
}

impl FromRef<AppState> for Arc<RenderService> {
    fn from_ref(state: &AppState) -> Self {
        state.renderer.clone()
    }
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    tracing::info!(
        quality_tiers = config.quality_tiers,
        default_crop_factor = config.default_crop_factor,
        session_ttl_secs = config.session_ttl_secs,
        "Configuration loaded"
    );

    Ok(AppState {
        sessions: Arc::new(Store::new()),
        ribbons: Arc::new(RibbonService::new(config.clone())),
        renderer: Arc::new(RenderService::new(asset_loader, config)),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Responses
/// that do not set their own `Cache-Control` get `no-store`, since session
/// state changes on every edit.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tables", get(api::get_tables))
        // Sessions
        .route("/api/sessions", post(api::create_session::<Store>))
        .route(
            "/api/sessions/:id",
            get(api::get_session::<Store>).delete(api::delete_session::<Store>),
        )
        .route(
            "/api/sessions/:id/crop-factor",
            put(api::set_crop_factor::<Store>),
        )
        .route("/api/sessions/:id/lenses", post(api::add_lens::<Store>))
        .route(
            "/api/sessions/:id/lenses/:lens_id",
            patch(api::update_lens::<Store>).delete(api::remove_lens::<Store>),
        )
        .route(
            "/api/sessions/:id/triggers/:field",
            post(api::trigger_focus::<Store>),
        )
        .route("/api/sessions/:id/submit", post(api::submit::<Store>))
        .route(
            "/api/sessions/:id/export/:format",
            get(api::export_session::<Store>),
        )
        .route(
            "/api/sessions/:id/ribbon.svg",
            get(api::session_svg::<Store>),
        )
        // One-shot
        .route("/api/ribbon", post(api::compute_ribbon))
        .route("/api/ribbon/export/:format", post(api::export_ribbon))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
