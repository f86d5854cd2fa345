//! Domain types for the Portico project registry.
//!
//! A project is identified by its endpoint URL; every record is keyed by
//! [`ProjectUrl`]. All types serialize via serde so the CLI can emit JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The endpoint URL of a configured project. Acts as the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectUrl(pub String);

impl ProjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectUrl {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where a record sits in its fetch lifecycle.
///
/// `Idle → Loading → {Loaded | Failed}`. Derived from the record fields, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Idle => write!(f, "idle"),
            RecordStatus::Loading => write!(f, "loading"),
            RecordStatus::Loaded => write!(f, "loaded"),
            RecordStatus::Failed => write!(f, "failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Public display metadata served by a project's API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectInfo {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_logo: Option<String>,
}

/// Everything the frontend knows about one configured project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub url: ProjectUrl,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub project_name: Option<String>,
    pub project_logo: Option<String>,
}

impl ProjectRecord {
    /// A freshly configured record: not loading, no error, no metadata.
    pub fn new(url: ProjectUrl) -> Self {
        Self {
            url,
            loading: false,
            error: None,
            project_name: None,
            project_logo: None,
        }
    }

    pub fn status(&self) -> RecordStatus {
        if self.loading {
            RecordStatus::Loading
        } else if self.error.is_some() {
            RecordStatus::Failed
        } else if self.project_name.is_some() || self.project_logo.is_some() {
            RecordStatus::Loaded
        } else {
            RecordStatus::Idle
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
