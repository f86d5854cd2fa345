//! Portico core library — project registry, configuration, collaborators.
//!
//! - [`types`] — newtypes and records
//! - [`error`] — [`FetchError`], [`ConfigError`]
//! - [`registry`] — [`ProjectRegistry`]: selection policy and fetch lifecycle
//! - [`config`] — load `~/.portico/config.yaml`
//! - [`query`] — `?project=` lookup
//! - [`notify`] — user-facing warnings

pub mod config;
pub mod error;
pub mod notify;
pub mod query;
pub mod registry;
pub mod types;

pub use config::PorticoConfig;
pub use error::{ConfigError, FetchError};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier, PROJECT_NOT_ALLOWED};
pub use registry::{ProjectRegistry, RegistryInit};
pub use types::{ProjectInfo, ProjectRecord, ProjectUrl, RecordStatus};
