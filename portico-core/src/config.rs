//! Frontend configuration: which project endpoints exist and whether links may
//! point elsewhere.
//!
//! # Storage layout
//!
//! ```text
//! ~/.portico/
//!   config.yaml
//! ```
//!
//! ```yaml
//! projects:
//!   - https://api.example.com/_/
//!   - https://staging.example.com/_/
//! allow_other_project: false
//! ```
//!
//! # API pattern
//!
//! - `load_at(home: &Path)` — explicit home; used in tests with `TempDir`
//! - `load()` — derives home from `dirs::home_dir()`, delegates to `load_at`
//! - `load_from(path)` — explicit file

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ProjectUrl;

/// Immutable snapshot of the frontend configuration, read once at start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PorticoConfig {
    /// Configured endpoints, in display order. The first one is the default.
    pub projects: Vec<ProjectUrl>,
    /// Allow `?project=` to select endpoints missing from `projects`.
    #[serde(default)]
    pub allow_other_project: bool,
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.portico/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".portico").join("config.yaml")
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load `<home>/.portico/config.yaml`.
pub fn load_at(home: &Path) -> Result<PorticoConfig, ConfigError> {
    load_from(&config_path_at(home))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<PorticoConfig, ConfigError> {
    load_at(&home()?)
}

/// Load and normalize a config file.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with path)
/// if malformed, `ConfigError::NoProjects` if the list is empty. Duplicate
/// endpoints keep their first position.
pub fn load_from(path: &Path) -> Result<PorticoConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    let mut config: PorticoConfig = serde_yaml::from_str(&contents).map_err(|e| {
        ConfigError::Parse { path: path.to_path_buf(), source: e }
    })?;

    config.projects = dedup_projects(config.projects);
    if config.projects.is_empty() {
        return Err(ConfigError::NoProjects { path: path.to_path_buf() });
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn dedup_projects(projects: Vec<ProjectUrl>) -> Vec<ProjectUrl> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|url| {
            let fresh = seen.insert(url.clone());
            if !fresh {
                tracing::warn!(url = %url, "duplicate project in config, keeping first");
            }
            fresh
        })
        .collect()
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
