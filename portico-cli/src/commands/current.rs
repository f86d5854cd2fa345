//! `portico current` — resolve the current project for a request URL.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use portico_core::{ProjectRegistry, RegistryInit, TracingNotifier};

use super::super::SessionArgs;

/// Arguments for `portico current`.
#[derive(Args, Debug)]
pub struct CurrentArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl CurrentArgs {
    pub fn run(self) -> Result<()> {
        let config = self.session.load_config()?;
        let init = RegistryInit::from_config(&config, self.session.request_url.as_deref());
        let registry = ProjectRegistry::initialize(init, &TracingNotifier);

        if self.json {
            let payload = json!({
                "current": registry.current_url(),
                "configured": registry.current().is_some(),
                "rejected": registry.selection_rejected(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize JSON")?
            );
            return Ok(());
        }

        match registry.current_url() {
            Some(url) if registry.current().is_some() => println!("{url}"),
            Some(url) => println!("{url} (not configured)"),
            None => println!("No current project."),
        }
        Ok(())
    }
}
