//! Recompute policy on top of the pure core.
//!
//! A submit or export validates the session form; only a fully valid form
//! replaces the stored ribbon. Anything else is reported and the previous
//! ribbon stays in place.

use ribbon_core::{
    recompute, ApertureScale, FocalBands, FormErrors, FormIssue, LensForm, RibbonGrid,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::models::{AppConfig, Ribbon, Session};

/// The static band table and aperture scale
#[derive(Debug, Clone, Default)]
pub struct RibbonTables {
    pub bands: FocalBands,
    pub scale: ApertureScale,
}

/// Whether a submit replaced the ribbon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Recomputed,
    Skipped,
}

/// Result of a validated recompute
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubmitOutcome {
    pub status: SubmitStatus,
    /// Validation problems that caused a skip; empty when recomputed
    #[schema(value_type = Vec<Object>)]
    pub issues: Vec<FormIssue>,
    /// The ribbon now in effect
    #[schema(value_type = Object)]
    pub ribbon: Ribbon,
}

pub struct RibbonService {
    config: Arc<AppConfig>,
    tables: RibbonTables,
}

impl RibbonService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            tables: RibbonTables::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tables(&self) -> &RibbonTables {
        &self.tables
    }

    pub fn tiers(&self) -> u32 {
        self.config.quality_tiers
    }

    /// A blank form with the configured default crop factor
    pub fn new_form(&self) -> LensForm {
        LensForm::new(Some(self.config.default_crop_factor))
    }

    /// Validate `form` and derive a fresh ribbon from it.
    pub fn compute(&self, form: &LensForm) -> Result<Ribbon, FormErrors> {
        let snapshot = form.snapshot(self.tiers())?;
        let grid = recompute(
            &snapshot.lenses,
            snapshot.crop_factor,
            &self.tables.bands,
            &self.tables.scale,
            self.tiers(),
        );
        Ok(Ribbon {
            crop_factor: snapshot.crop_factor,
            grid,
        })
    }

    /// The session's last valid ribbon, or an all-background one.
    pub fn current(&self, session: &Session) -> Ribbon {
        session.ribbon.clone().unwrap_or_else(|| Ribbon {
            crop_factor: session
                .form
                .crop_factor()
                .unwrap_or(self.config.default_crop_factor),
            grid: RibbonGrid::blank(self.tiers(), self.tables.bands.len()),
        })
    }

    /// Recompute the session's ribbon if its form validates.
    pub fn submit(&self, session: &mut Session) -> SubmitOutcome {
        session.touch();
        match self.compute(&session.form) {
            Ok(ribbon) => {
                tracing::info!(
                    session = %session.id,
                    lenses = session.form.len(),
                    crop_factor = ribbon.crop_factor,
                    painted = ribbon.grid.painted_cells(),
                    "Ribbon recomputed"
                );
                session.ribbon = Some(ribbon.clone());
                SubmitOutcome {
                    status: SubmitStatus::Recomputed,
                    issues: Vec::new(),
                    ribbon,
                }
            }
            Err(errors) => {
                tracing::info!(
                    session = %session.id,
                    issues = errors.issues().len(),
                    "Form invalid, keeping previous ribbon"
                );
                SubmitOutcome {
                    status: SubmitStatus::Skipped,
                    issues: errors.0,
                    ribbon: self.current(session),
                }
            }
        }
    }
}
