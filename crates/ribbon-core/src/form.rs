//! Lens registry backing the ribbon form
//!
//! [`LensForm`] owns the ordered rows a user is editing plus the form-level
//! crop factor. Rows start blank and are filled field by field; only a form in
//! which every row validates produces a [`FormSnapshot`] for the aggregator.
//!
//! The form also carries the trigger-row interaction rule: focusing any field
//! of the permanent "add next lens" row appends a fresh row and moves focus to
//! the same field on it (see [`LensForm::on_trigger_focus`]).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FormErrors, FormField, FormIssue, IssueKind};
use crate::lens::{LensId, LensRange};

/// Field categories of a lens row. Each has one trigger input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LensField {
    Brand,
    Model,
    From,
    To,
    Aperture,
    Quality,
}

impl LensField {
    pub const ALL: [LensField; 6] = [
        LensField::Brand,
        LensField::Model,
        LensField::From,
        LensField::To,
        LensField::Aperture,
        LensField::Quality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LensField::Brand => "brand",
            LensField::Model => "model",
            LensField::From => "from",
            LensField::To => "to",
            LensField::Aperture => "aperture",
            LensField::Quality => "quality",
        }
    }
}

impl fmt::Display for LensField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LensField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LensField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown lens field: {s}"))
    }
}

/// Field values of a row without its id. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LensDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default)]
    pub aperture: Option<f64>,
    #[serde(default)]
    pub quality: Option<u32>,
}

/// One editable row of the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensRow {
    pub id: LensId,
    #[serde(flatten)]
    pub values: LensDraft,
}

impl LensRow {
    /// Lower bound for `to`, derived from `from` whenever it changes.
    pub fn to_min(&self) -> Option<f64> {
        self.values.from
    }

    fn validate(&self, tiers: u32, issues: &mut Vec<FormIssue>) -> Option<LensRange> {
        let mut issue = |field, kind| {
            issues.push(FormIssue {
                lens: Some(self.id),
                field: FormField::Lens(field),
                kind,
            })
        };
        let v = &self.values;

        let from = match check_positive(v.from) {
            Ok(value) => Some(value),
            Err(kind) => {
                issue(LensField::From, kind);
                None
            }
        };

        let to = match (check_positive(v.to), self.to_min()) {
            (Ok(value), Some(min)) if from.is_some() && value < min => {
                issue(LensField::To, IssueKind::BelowMinimum);
                None
            }
            (Ok(value), _) => Some(value),
            (Err(kind), _) => {
                issue(LensField::To, kind);
                None
            }
        };

        let aperture = match check_positive(v.aperture) {
            Ok(value) => Some(value),
            Err(kind) => {
                issue(LensField::Aperture, kind);
                None
            }
        };

        let quality = match v.quality {
            None => {
                issue(LensField::Quality, IssueKind::Missing);
                None
            }
            Some(q) if q == 0 || q > tiers => {
                issue(LensField::Quality, IssueKind::OutOfRange);
                None
            }
            Some(q) => Some(q),
        };

        Some(LensRange {
            id: self.id,
            from_focal: from?,
            to_focal: to?,
            aperture: aperture?,
            quality_tier: quality?,
        })
    }
}

/// Partial update for a row.
///
/// An absent key leaves the field untouched, an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LensPatch {
    #[serde(default, deserialize_with = "present")]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub from: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub to: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub aperture: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub quality: Option<Option<u32>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Result of adding a row: its id and the field that receives focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddedLens {
    pub id: LensId,
    pub focus: LensField,
}

/// Validated form contents, ready for [`crate::recompute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub crop_factor: f64,
    pub lenses: Vec<LensRange>,
}

/// The lens registry: ordered rows plus the crop factor field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensForm {
    crop_factor: Option<f64>,
    rows: Vec<LensRow>,
    #[serde(skip)]
    next_id: u64,
}

impl LensForm {
    pub fn new(crop_factor: Option<f64>) -> Self {
        Self {
            crop_factor,
            rows: Vec::new(),
            next_id: 0,
        }
    }

    pub fn crop_factor(&self) -> Option<f64> {
        self.crop_factor
    }

    pub fn set_crop_factor(&mut self, crop_factor: Option<f64>) {
        self.crop_factor = crop_factor;
    }

    pub fn rows(&self) -> &[LensRow] {
        &self.rows
    }

    pub fn row(&self, id: LensId) -> Option<&LensRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a blank row before the trigger row.
    pub fn add_lens(&mut self, focus: LensField) -> AddedLens {
        let id = self.push_draft(LensDraft::default());
        AddedLens { id, focus }
    }

    /// Append a row with the given values and return its id.
    pub fn push_draft(&mut self, values: LensDraft) -> LensId {
        let id = LensId(self.next_id);
        self.next_id += 1;
        self.rows.push(LensRow { id, values });
        id
    }

    /// Trigger rule: focusing `field` on the trigger row adds a lens and
    /// focuses the same field on the new row.
    pub fn on_trigger_focus(&mut self, field: LensField) -> AddedLens {
        self.add_lens(field)
    }

    /// Remove a row; other rows keep their ids and values.
    pub fn remove_lens(&mut self, id: LensId) -> Option<LensRow> {
        let index = self.rows.iter().position(|row| row.id == id)?;
        Some(self.rows.remove(index))
    }

    /// Apply a partial update to one row.
    pub fn update_lens(&mut self, id: LensId, patch: LensPatch) -> Option<&LensRow> {
        let row = self.rows.iter_mut().find(|row| row.id == id)?;
        let v = &mut row.values;
        if let Some(brand) = patch.brand {
            v.brand = brand;
        }
        if let Some(model) = patch.model {
            v.model = model;
        }
        if let Some(from) = patch.from {
            v.from = from;
        }
        if let Some(to) = patch.to {
            v.to = to;
        }
        if let Some(aperture) = patch.aperture {
            v.aperture = aperture;
        }
        if let Some(quality) = patch.quality {
            v.quality = quality;
        }
        Some(row)
    }

    /// Validate the whole form and return its lenses in row order.
    ///
    /// Fails with every issue found if the crop factor or any row is invalid;
    /// there is no partial snapshot.
    pub fn snapshot(&self, tiers: u32) -> Result<FormSnapshot, FormErrors> {
        let mut issues = Vec::new();

        let crop_factor = match check_positive(self.crop_factor) {
            Ok(value) => Some(value),
            Err(kind) => {
                issues.push(FormIssue {
                    lens: None,
                    field: FormField::CropFactor,
                    kind,
                });
                None
            }
        };

        let lenses: Vec<Option<LensRange>> = self
            .rows
            .iter()
            .map(|row| row.validate(tiers, &mut issues))
            .collect();

        match crop_factor {
            Some(crop_factor) if issues.is_empty() => Ok(FormSnapshot {
                crop_factor,
                lenses: lenses.into_iter().flatten().collect(),
            }),
            _ => Err(FormErrors(issues)),
        }
    }
}

impl Default for LensForm {
    fn default() -> Self {
        Self::new(Some(1.0))
    }
}

fn check_positive(value: Option<f64>) -> Result<f64, IssueKind> {
    match value {
        None => Err(IssueKind::Missing),
        Some(v) if !v.is_finite() => Err(IssueKind::NotFinite),
        Some(v) if v <= 0.0 => Err(IssueKind::NotPositive),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(from: f64, to: f64, aperture: f64, quality: u32) -> LensDraft {
        LensDraft {
            from: Some(from),
            to: Some(to),
            aperture: Some(aperture),
            quality: Some(quality),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_lens_allocates_fresh_ids() {
        let mut form = LensForm::default();
        let a = form.add_lens(LensField::From);
        let b = form.add_lens(LensField::Aperture);
        assert_ne!(a.id, b.id);
        assert_eq!(b.focus, LensField::Aperture);
        assert_eq!(form.len(), 2);
        assert_eq!(form.row(a.id).unwrap().values, LensDraft::default());
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut form = LensForm::default();
        let a = form.add_lens(LensField::From).id;
        form.remove_lens(a);
        let b = form.add_lens(LensField::From).id;
        assert_ne!(a, b);
    }

    #[test]
    fn test_trigger_focus_adds_row_and_keeps_field() {
        let mut form = LensForm::default();
        let added = form.on_trigger_focus(LensField::Quality);
        assert_eq!(added.focus, LensField::Quality);
        assert_eq!(form.rows().last().map(|r| r.id), Some(added.id));
    }

    #[test]
    fn test_update_sets_and_clears() {
        let mut form = LensForm::default();
        let id = form.push_draft(filled(24.0, 70.0, 2.8, 1));
        let patch: LensPatch =
            serde_json::from_str(r#"{"to": null, "brand": "Sigma"}"#).unwrap();
        let row = form.update_lens(id, patch).unwrap();
        assert_eq!(row.values.to, None);
        assert_eq!(row.values.from, Some(24.0));
        assert_eq!(row.values.brand.as_deref(), Some("Sigma"));
    }

    #[test]
    fn test_update_unknown_row() {
        let mut form = LensForm::default();
        assert!(form.update_lens(LensId(7), LensPatch::default()).is_none());
        assert!(form.remove_lens(LensId(7)).is_none());
    }

    #[test]
    fn test_to_min_follows_from() {
        let mut form = LensForm::default();
        let id = form.push_draft(filled(24.0, 70.0, 2.8, 1));
        let patch = LensPatch {
            from: Some(Some(35.0)),
            ..Default::default()
        };
        assert_eq!(form.update_lens(id, patch).unwrap().to_min(), Some(35.0));
    }

    #[test]
    fn test_snapshot_valid_form() {
        let mut form = LensForm::new(Some(1.5));
        form.push_draft(filled(24.0, 70.0, 2.8, 1));
        form.push_draft(filled(70.0, 200.0, 4.0, 2));
        let snapshot = form.snapshot(3).unwrap();
        assert_eq!(snapshot.crop_factor, 1.5);
        assert_eq!(snapshot.lenses.len(), 2);
        assert_eq!(snapshot.lenses[1].quality_tier, 2);
    }

    #[test]
    fn test_snapshot_blank_row_fails() {
        let mut form = LensForm::default();
        form.push_draft(filled(24.0, 70.0, 2.8, 1));
        let blank = form.add_lens(LensField::From).id;
        let errors = form.snapshot(3).unwrap_err();
        assert_eq!(errors.issues().len(), 4);
        assert!(errors
            .issues()
            .iter()
            .all(|i| i.lens == Some(blank) && i.kind == IssueKind::Missing));
    }

    #[test]
    fn test_snapshot_reports_each_rule() {
        let mut form = LensForm::new(Some(0.0));
        let id = form.push_draft(filled(70.0, 24.0, -1.0, 4));
        let issues = form.snapshot(3).unwrap_err().0;
        let kinds: Vec<(FormField, IssueKind)> =
            issues.iter().map(|i| (i.field, i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (FormField::CropFactor, IssueKind::NotPositive),
                (FormField::Lens(LensField::To), IssueKind::BelowMinimum),
                (FormField::Lens(LensField::Aperture), IssueKind::NotPositive),
                (FormField::Lens(LensField::Quality), IssueKind::OutOfRange),
            ]
        );
        assert!(issues[1..].iter().all(|i| i.lens == Some(id)));
    }

    #[test]
    fn test_snapshot_missing_crop_factor() {
        let form = LensForm::new(None);
        let issues = form.snapshot(3).unwrap_err().0;
        assert_eq!(issues[0].field, FormField::CropFactor);
        assert_eq!(issues[0].kind, IssueKind::Missing);
    }

    #[test]
    fn test_snapshot_empty_form_is_valid() {
        let snapshot = LensForm::default().snapshot(3).unwrap();
        assert!(snapshot.lenses.is_empty());
    }

    #[test]
    fn test_lens_field_parse() {
        assert_eq!("Aperture".parse::<LensField>(), Ok(LensField::Aperture));
        assert!("focal".parse::<LensField>().is_err());
    }
}
