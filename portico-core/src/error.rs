//! Error types for portico-core.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why fetching a project's display metadata failed.
///
/// Stored on the project record rather than propagated, so it is `Clone` and
/// serializable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, TLS error and the like.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {code}")]
    Status { code: u16 },

    /// The body was not JSON or had no `data.api` object.
    #[error("malformed response body: {0}")]
    Malformed(String),

    /// The fetch task panicked or was aborted before it produced a result.
    #[error("fetch task failed: {0}")]
    Join(String),
}

/// All errors that can arise while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.portico/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config lists no projects at all.
    #[error("config at {path} lists no projects")]
    NoProjects { path: PathBuf },
}
