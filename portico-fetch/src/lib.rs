//! Startup metadata fan-out: one fetch task per configured project.

pub mod client;
mod error;
mod runtime;

pub use client::{decode_info, HttpMetadataSource, MetadataSource};
pub use error::BootstrapError;
pub use runtime::{
    bootstrap_blocking, fetch_all, init_tracing, load_blocking, start, SharedRegistry, Startup,
};
