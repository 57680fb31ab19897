//! Error types for color parsing and table validation
//!
//! Form validation problems are not errors in the usual sense: they are
//! collected as [`FormIssue`] values so the caller can report every problem
//! at once and keep its previous ribbon.

use std::fmt;
use std::num::ParseIntError;

use crate::form::LensField;
use crate::lens::LensId;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for band table and aperture scale construction.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// Fewer breakpoints than the two a ribbon needs
    TooFewBreakpoints {
        /// Number of breakpoints supplied
        count: usize,
    },
    /// Aperture scale without any threshold step
    EmptyScale,
    /// A value is NaN or infinite
    NotFinite {
        /// Index of the offending value
        index: usize,
    },
    /// A value is not strictly greater than its predecessor
    NotAscending {
        /// Index of the offending value
        index: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::TooFewBreakpoints { count } => {
                write!(f, "focal bands need at least 2 breakpoints, got {}", count)
            }
            TableError::EmptyScale => write!(f, "aperture scale cannot be empty"),
            TableError::NotFinite { index } => {
                write!(f, "value at index {} is not a finite number", index)
            }
            TableError::NotAscending { index } => {
                write!(f, "value at index {} is not strictly ascending", index)
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Why a form value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Required value is empty
    Missing,
    /// Value is NaN or infinite
    NotFinite,
    /// Value must be greater than zero
    NotPositive,
    /// `to` is below the row's `from`
    BelowMinimum,
    /// Quality tier outside `1..=tiers`
    OutOfRange,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IssueKind::Missing => "is required",
            IssueKind::NotFinite => "must be a number",
            IssueKind::NotPositive => "must be greater than zero",
            IssueKind::BelowMinimum => "must not be below the from focal length",
            IssueKind::OutOfRange => "is outside the available quality tiers",
        };
        f.write_str(text)
    }
}

/// A single validation failure in the lens form.
///
/// `lens` is `None` for the form-level crop factor field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FormIssue {
    pub lens: Option<LensId>,
    pub field: FormField,
    pub kind: IssueKind,
}

/// Field a [`FormIssue`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    CropFactor,
    Lens(LensField),
}

impl fmt::Display for FormIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lens, self.field) {
            (Some(id), FormField::Lens(field)) => {
                write!(f, "lens {}: {} {}", id, field, self.kind)
            }
            (_, FormField::Lens(field)) => write!(f, "{} {}", field, self.kind),
            (_, FormField::CropFactor) => write!(f, "crop factor {}", self.kind),
        }
    }
}

/// Every issue found while validating a form; never empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct FormErrors(pub Vec<FormIssue>);

impl FormErrors {
    pub fn issues(&self) -> &[FormIssue] {
        &self.0
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form is invalid: ")?;
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}
