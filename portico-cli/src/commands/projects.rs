//! `portico projects` — fetch and show display metadata for every project.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use portico_core::{ProjectRecord, ProjectRegistry, ProjectUrl, RecordStatus, TracingNotifier};
use portico_fetch::{bootstrap_blocking, HttpMetadataSource};

use super::super::SessionArgs;

/// Arguments for `portico projects`.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ProjectsArgs {
    pub fn run(self) -> Result<()> {
        let source = Arc::new(HttpMetadataSource::with_timeout(Duration::from_secs(
            self.timeout,
        )));
        let registry = bootstrap_blocking(
            self.session.config.as_deref(),
            self.session.request_url.as_deref(),
            &TracingNotifier,
            source,
        )
        .context("failed to load project metadata")?;

        if self.json {
            return print_json(&registry);
        }
        print_table(&registry);
        Ok(())
    }
}

#[derive(Serialize)]
struct ProjectsJson<'a> {
    current: Option<&'a ProjectUrl>,
    projects: Vec<ProjectJson<'a>>,
}

#[derive(Serialize)]
struct ProjectJson<'a> {
    #[serde(flatten)]
    record: &'a ProjectRecord,
    status: RecordStatus,
    current: bool,
}

#[derive(Tabled)]
struct ProjectTableRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "url")]
    url: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "logo")]
    logo: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_json(registry: &ProjectRegistry) -> Result<()> {
    let current = registry.current_url();
    let payload = ProjectsJson {
        current,
        projects: registry
            .records()
            .iter()
            .map(|record| ProjectJson {
                record,
                status: record.status(),
                current: Some(&record.url) == current,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize projects JSON")?
    );
    Ok(())
}

fn print_table(registry: &ProjectRegistry) {
    let failed = registry
        .records()
        .iter()
        .filter(|r| r.status() == RecordStatus::Failed)
        .count();
    println!(
        "Portico v{} | {} projects | {} failed",
        env!("CARGO_PKG_VERSION"),
        registry.len(),
        failed,
    );

    let current = registry.current_url();
    let rows: Vec<ProjectTableRow> = registry
        .records()
        .iter()
        .map(|record| ProjectTableRow {
            marker: if Some(&record.url) == current { "*" } else { "" },
            url: record.url.to_string(),
            status: record.status().to_string().to_uppercase(),
            name: record.project_name.clone().unwrap_or_else(|| "-".to_string()),
            logo: record.project_logo.clone().unwrap_or_else(|| "-".to_string()),
            detail: record
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    match current {
        Some(url) if registry.current().is_none() => {
            println!("Current: {} {}", url, "(not configured)".bright_black());
        }
        Some(url) => println!("Current: {}", url.to_string().green().bold()),
        None => println!("{}", "No current project.".yellow()),
    }
}
