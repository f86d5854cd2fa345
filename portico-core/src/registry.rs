//! The project registry: every configured project, its fetch lifecycle, and
//! the one the session is currently pointed at.
//!
//! # Selection policy
//!
//! Evaluated once by [`ProjectRegistry::initialize`]:
//!
//! 1. no `?project=` requested → the first configured project
//! 2. `allow_other_project` → the requested URL, configured or not
//! 3. requested URL is configured → the requested URL
//! 4. otherwise → nothing selected, and the notifier gets
//!    [`PROJECT_NOT_ALLOWED`]
//!
//! Case 4 leaves the registry without a current project on purpose; callers
//! see `current() == None` rather than a silent fallback.
//!
//! # Fetch lifecycle
//!
//! `begin_fetch` claims the one fetch pass and marks every record pending;
//! then `mark_success | mark_failure` per record, each a single call to the
//! private `update_record` merge. The registry performs no I/O itself; the
//! fan-out lives in `portico-fetch`.

use std::collections::HashMap;

use crate::config::PorticoConfig;
use crate::error::FetchError;
use crate::notify::{Notifier, PROJECT_NOT_ALLOWED};
use crate::query;
use crate::types::{ProjectInfo, ProjectRecord, ProjectUrl};

/// Everything `initialize` needs, captured up front instead of read from
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryInit {
    pub projects: Vec<ProjectUrl>,
    pub allow_other_project: bool,
    pub requested: Option<ProjectUrl>,
}

impl RegistryInit {
    /// Snapshot `config`, taking the requested project from the `?project=`
    /// parameter of `location` when one is given.
    pub fn from_config(config: &PorticoConfig, location: Option<&str>) -> Self {
        Self {
            projects: config.projects.clone(),
            allow_other_project: config.allow_other_project,
            requested: location.and_then(query::requested_project),
        }
    }
}

/// A partial [`ProjectRecord`]: `None` means "leave this field alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RecordChanges {
    loading: Option<bool>,
    error: Option<Option<FetchError>>,
    project_name: Option<Option<String>>,
    project_logo: Option<Option<String>>,
}

/// Ordered set of project records plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRegistry {
    records: Vec<ProjectRecord>,
    index: HashMap<ProjectUrl, usize>,
    current: Option<ProjectUrl>,
    selection_rejected: bool,
    fetch_started: bool,
}

impl ProjectRegistry {
    // -----------------------------------------------------------------------
    // 1. Initialize
    // -----------------------------------------------------------------------

    /// Build one idle record per configured URL and apply the selection policy.
    ///
    /// Repeated URLs keep their first position. Issues no network calls.
    pub fn initialize(init: RegistryInit, notifier: &dyn Notifier) -> Self {
        let mut registry = Self::default();
        for url in init.projects {
            if registry.index.contains_key(&url) {
                continue;
            }
            registry.index.insert(url.clone(), registry.records.len());
            registry.records.push(ProjectRecord::new(url));
        }

        match init.requested {
            None => {
                registry.current = registry.records.first().map(|r| r.url.clone());
            }
            Some(requested) if init.allow_other_project => {
                registry.current = Some(requested);
            }
            Some(requested) if registry.index.contains_key(&requested) => {
                registry.current = Some(requested);
            }
            Some(requested) => {
                tracing::debug!(url = %requested, "requested project is not in the allow-list");
                registry.selection_rejected = true;
                notifier.warn(PROJECT_NOT_ALLOWED);
            }
        }
        registry
    }

    // -----------------------------------------------------------------------
    // 2. Read access
    // -----------------------------------------------------------------------

    /// Records in configuration order.
    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn urls(&self) -> impl Iterator<Item = &ProjectUrl> {
        self.records.iter().map(|r| &r.url)
    }

    pub fn record(&self, url: &ProjectUrl) -> Option<&ProjectRecord> {
        self.index.get(url).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The selected URL, which may name an unconfigured project when
    /// arbitrary projects are allowed.
    pub fn current_url(&self) -> Option<&ProjectUrl> {
        self.current.as_ref()
    }

    /// The record of the selected project, or `None` when nothing is selected
    /// or the selection has no record.
    pub fn current(&self) -> Option<&ProjectRecord> {
        self.current.as_ref().and_then(|url| self.record(url))
    }

    /// Whether initialization refused the requested project.
    pub fn selection_rejected(&self) -> bool {
        self.selection_rejected
    }

    // -----------------------------------------------------------------------
    // 3. Selection
    // -----------------------------------------------------------------------

    /// Point the session at `url`. No validation.
    pub fn select_current(&mut self, url: ProjectUrl) {
        self.current = Some(url);
    }

    // -----------------------------------------------------------------------
    // 4. Fetch lifecycle
    // -----------------------------------------------------------------------

    /// Mark every record pending and return their URLs, in order.
    ///
    /// Only the first call per registry claims the fetch; later calls return
    /// nothing and touch no record, so each URL is fetched at most once.
    pub fn begin_fetch(&mut self) -> Vec<ProjectUrl> {
        if self.fetch_started {
            return Vec::new();
        }
        self.fetch_started = true;
        let urls: Vec<ProjectUrl> = self.urls().cloned().collect();
        for url in &urls {
            self.mark_pending(url);
        }
        urls
    }

    /// Whether [`begin_fetch`](Self::begin_fetch) has already run.
    pub fn fetch_started(&self) -> bool {
        self.fetch_started
    }

    pub fn mark_pending(&mut self, url: &ProjectUrl) {
        self.update_record(
            url,
            RecordChanges { loading: Some(true), ..Default::default() },
        );
    }

    pub fn mark_success(&mut self, url: &ProjectUrl, info: ProjectInfo) {
        self.update_record(
            url,
            RecordChanges {
                loading: Some(false),
                error: Some(None),
                project_name: Some(info.project_name),
                project_logo: Some(info.project_logo),
            },
        );
    }

    /// Metadata from earlier is left in place.
    pub fn mark_failure(&mut self, url: &ProjectUrl, error: FetchError) {
        self.update_record(
            url,
            RecordChanges {
                loading: Some(false),
                error: Some(Some(error)),
                ..Default::default()
            },
        );
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Merge `changes` into the record for `url`. Returns `false` for unknown URLs.
    fn update_record(&mut self, url: &ProjectUrl, changes: RecordChanges) -> bool {
        let Some(&i) = self.index.get(url) else {
            tracing::debug!(url = %url, "update for unknown project ignored");
            return false;
        };
        let record = &mut self.records[i];
        if let Some(loading) = changes.loading {
            record.loading = loading;
        }
        if let Some(error) = changes.error {
            record.error = error;
        }
        if let Some(name) = changes.project_name {
            record.project_name = name;
        }
        if let Some(logo) = changes.project_logo {
            record.project_logo = logo;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
