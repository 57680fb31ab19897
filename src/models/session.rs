use chrono::{DateTime, Utc};
use ribbon_core::{LensForm, RibbonGrid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session identifier handed out on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        use rand::Rng;
        let id: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A computed grid together with the crop factor it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ribbon {
    pub crop_factor: f64,
    pub grid: RibbonGrid,
}

/// One user's form plus the last ribbon that validated.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub form: LensForm,
    /// `None` until the first successful recompute
    pub ribbon: Option<Ribbon>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, form: LensForm) -> Self {
        Self {
            id,
            form,
            ribbon: None,
            last_seen: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn is_idle(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.last_seen > ttl
    }
}
