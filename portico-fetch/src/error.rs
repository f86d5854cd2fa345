use thiserror::Error;

use portico_core::ConfigError;

/// Error surface for the blocking startup entrypoints.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
