//! Lens documents: a whole form in one file or request body.
//!
//! ```yaml
//! crop_factor: 1.5
//! lenses:
//!   - { brand: Sigma, model: Art, from: 24, to: 70, aperture: 2.8, quality: 1 }
//! ```

use ribbon_core::{LensDraft, LensForm};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;

/// Crop factor plus lens rows, in form order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LensDocument {
    /// Sensor crop factor; the configured default applies when omitted
    #[serde(default)]
    pub crop_factor: Option<f64>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub lenses: Vec<LensDraft>,
}

impl LensDocument {
    /// Parse a document, choosing YAML or JSON by file extension.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let document = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(document)
    }

    /// Build a form with one row per lens, in document order.
    pub fn into_form(self, default_crop_factor: f64) -> LensForm {
        let mut form = LensForm::new(Some(self.crop_factor.unwrap_or(default_crop_factor)));
        for draft in self.lenses {
            form.push_draft(draft);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_document() {
        let yaml = r#"
crop_factor: 1.5
lenses:
  - { brand: Sigma, model: Art, from: 24, to: 70, aperture: 2.8, quality: 1 }
  - { from: 70, to: 200, aperture: 4, quality: 2 }
"#;
        let document: LensDocument = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(document.crop_factor, Some(1.5));
        assert_eq!(document.lenses.len(), 2);
        assert_eq!(document.lenses[0].brand.as_deref(), Some("Sigma"));
        assert_eq!(document.lenses[1].to, Some(200.0));
    }

    #[test]
    fn test_into_form_keeps_order_and_default_crop() {
        let document = LensDocument {
            crop_factor: None,
            lenses: vec![
                LensDraft {
                    from: Some(50.0),
                    ..Default::default()
                },
                LensDraft {
                    from: Some(85.0),
                    ..Default::default()
                },
            ],
        };
        let form = document.into_form(1.6);
        assert_eq!(form.crop_factor(), Some(1.6));
        let froms: Vec<_> = form.rows().iter().map(|r| r.values.from).collect();
        assert_eq!(froms, vec![Some(50.0), Some(85.0)]);
    }

    #[test]
    fn test_from_path_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"crop_factor": 2.0, "lenses": [{{"from": 12, "to": 40, "aperture": 2.8, "quality": 1}}]}}"#
        )
        .unwrap();

        let document = LensDocument::from_path(file.path()).unwrap();
        assert_eq!(document.crop_factor, Some(2.0));
        assert_eq!(document.lenses[0].from, Some(12.0));
    }

    #[test]
    fn test_from_path_invalid_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "lenses: [not, a, lens").unwrap();
        assert!(LensDocument::from_path(file.path()).is_err());
    }
}
