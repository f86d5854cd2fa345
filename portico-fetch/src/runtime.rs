use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use portico_core::{
    config, FetchError, Notifier, PorticoConfig, ProjectRegistry, ProjectUrl, RegistryInit,
};

use crate::client::MetadataSource;
use crate::error::BootstrapError;

/// Registry shared between its owner and the fetch tasks.
pub type SharedRegistry = Arc<RwLock<ProjectRegistry>>;

/// A freshly started registry and the fetch tasks populating it.
#[derive(Debug)]
pub struct Startup {
    pub registry: SharedRegistry,
    pub tasks: Vec<JoinHandle<()>>,
}

impl Startup {
    /// Wait for every fetch task, then hand back the registry.
    pub async fn settle(self) -> SharedRegistry {
        for task in self.tasks {
            if let Err(err) = task.await {
                tracing::error!(error = %err, "fetch task join error");
            }
        }
        self.registry
    }
}

/// Initialize the registry from `config` and start fetching metadata for
/// every configured project.
pub async fn start(
    config: &PorticoConfig,
    location: Option<&str>,
    notifier: &dyn Notifier,
    source: Arc<dyn MetadataSource>,
) -> Startup {
    let init = RegistryInit::from_config(config, location);
    let registry = Arc::new(RwLock::new(ProjectRegistry::initialize(init, notifier)));
    let tasks = fetch_all(&registry, source).await;
    Startup { registry, tasks }
}

/// Mark every record pending, then spawn one independent fetch task per project.
///
/// All pending marks land before the first request is issued. Tasks never
/// wait on each other; a failure only touches its own record. A registry is
/// fetched once: calling this again returns no handles and issues no requests.
pub async fn fetch_all(
    registry: &SharedRegistry,
    source: Arc<dyn MetadataSource>,
) -> Vec<JoinHandle<()>> {
    let urls = registry.write().await.begin_fetch();
    if urls.is_empty() {
        return Vec::new();
    }
    tracing::debug!(count = urls.len(), "fetching project metadata");

    urls.into_iter()
        .map(|url| spawn_fetch(registry.clone(), source.clone(), url))
        .collect()
}

fn spawn_fetch(
    registry: SharedRegistry,
    source: Arc<dyn MetadataSource>,
    url: ProjectUrl,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let request_url = url.clone();
        let outcome = tokio::task::spawn_blocking(move || source.fetch(&request_url))
            .await
            .unwrap_or_else(|err| Err(FetchError::Join(err.to_string())));

        let mut guard = registry.write().await;
        match outcome {
            Ok(info) => {
                tracing::info!(
                    url = %url,
                    name = info.project_name.as_deref().unwrap_or("-"),
                    "project metadata loaded",
                );
                guard.mark_success(&url, info);
            }
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "project metadata fetch failed");
                guard.mark_failure(&url, err);
            }
        }
    })
}

/// Read the config file at `config_path` (or `~/.portico/config.yaml`), then
/// [`load_blocking`].
pub fn bootstrap_blocking(
    config_path: Option<&Path>,
    location: Option<&str>,
    notifier: &dyn Notifier,
    source: Arc<dyn MetadataSource>,
) -> Result<ProjectRegistry, BootstrapError> {
    let config = match config_path {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };
    load_blocking(&config, location, notifier, source)
}

/// Start the registry on a private runtime, block until every fetch settles,
/// and return the final state.
///
/// Embedders without a UI of their own pass [`portico_core::TracingNotifier`].
pub fn load_blocking(
    config: &PorticoConfig,
    location: Option<&str>,
    notifier: &dyn Notifier,
    source: Arc<dyn MetadataSource>,
) -> Result<ProjectRegistry, BootstrapError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(BootstrapError::Runtime)?;
    let registry = runtime.block_on(async {
        let registry = start(config, location, notifier, source).await.settle().await;
        let snapshot = registry.read().await.clone();
        snapshot
    });
    Ok(registry)
}

/// Install the `tracing` subscriber on stderr. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use portico_core::{ProjectInfo, RecordingNotifier};

    struct CannedSource {
        answers: HashMap<ProjectUrl, Result<ProjectInfo, FetchError>>,
    }

    impl MetadataSource for CannedSource {
        fn fetch(&self, url: &ProjectUrl) -> Result<ProjectInfo, FetchError> {
            self.answers
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Status { code: 404 }))
        }
    }

    struct PanickingSource;

    impl MetadataSource for PanickingSource {
        fn fetch(&self, _url: &ProjectUrl) -> Result<ProjectInfo, FetchError> {
            panic!("source blew up");
        }
    }

    /// Blocks every fetch until the test releases it.
    struct GatedSource {
        gate: Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl MetadataSource for GatedSource {
        fn fetch(&self, _url: &ProjectUrl) -> Result<ProjectInfo, FetchError> {
            let gate = self.gate.lock().map_err(|e| FetchError::Join(e.to_string()))?;
            gate.recv().map_err(|e| FetchError::Join(e.to_string()))?;
            Ok(ProjectInfo::default())
        }
    }

    fn config(urls: &[&str]) -> PorticoConfig {
        PorticoConfig {
            projects: urls.iter().copied().map(ProjectUrl::from).collect(),
            allow_other_project: false,
        }
    }

    #[tokio::test]
    async fn all_records_pending_before_any_fetch_completes() {
        let (release, gate) = std::sync::mpsc::channel();
        let source = Arc::new(GatedSource { gate: Mutex::new(gate) });
        let startup = start(
            &config(&["https://a.test", "https://b.test"]),
            None,
            &RecordingNotifier::new(),
            source,
        )
        .await;

        {
            let registry = startup.registry.read().await;
            assert!(registry.records().iter().all(|r| r.loading));
        }

        release.send(()).expect("release a");
        release.send(()).expect("release b");
        let registry = startup.settle().await;
        let registry = registry.read().await;
        assert!(registry.records().iter().all(|r| !r.loading && r.error.is_none()));
    }

    #[tokio::test]
    async fn unknown_project_fails_alone() {
        let mut answers = HashMap::new();
        answers.insert(
            ProjectUrl::from("https://a.test"),
            Ok(ProjectInfo {
                project_name: Some("A".to_string()),
                project_logo: None,
            }),
        );
        let source = Arc::new(CannedSource { answers });

        let registry = start(
            &config(&["https://a.test", "https://b.test"]),
            None,
            &RecordingNotifier::new(),
            source,
        )
        .await
        .settle()
        .await;
        let registry = registry.read().await;

        assert_eq!(registry.records()[0].project_name.as_deref(), Some("A"));
        assert_eq!(
            registry.records()[1].error,
            Some(FetchError::Status { code: 404 })
        );
    }

    #[tokio::test]
    async fn panicking_source_records_join_error() {
        let registry = start(
            &config(&["https://a.test"]),
            None,
            &RecordingNotifier::new(),
            Arc::new(PanickingSource),
        )
        .await
        .settle()
        .await;
        let registry = registry.read().await;
        let record = &registry.records()[0];
        assert!(!record.loading);
        assert!(matches!(record.error, Some(FetchError::Join(_))));
    }

    #[test]
    fn load_blocking_returns_settled_snapshot() {
        let mut answers = HashMap::new();
        answers.insert(
            ProjectUrl::from("https://a.test"),
            Ok(ProjectInfo {
                project_name: Some("A".to_string()),
                project_logo: Some("a.png".to_string()),
            }),
        );
        let registry = load_blocking(
            &config(&["https://a.test"]),
            Some("/?project=https://a.test"),
            &RecordingNotifier::new(),
            Arc::new(CannedSource { answers }),
        )
        .expect("load");

        let current = registry.current().expect("current");
        assert_eq!(current.project_logo.as_deref(), Some("a.png"));
        assert!(!current.loading);
    }

    #[test]
    fn bootstrap_reports_missing_config() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let missing = dir.path().join("config.yaml");
        let err = bootstrap_blocking(
            Some(&missing),
            None,
            &RecordingNotifier::new(),
            Arc::new(PanickingSource),
        )
        .unwrap_err();
        assert!(
            matches!(err, BootstrapError::Config(portico_core::ConfigError::NotFound { .. })),
            "got: {err}"
        );
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn bootstrap_loads_config_then_fetches() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "projects:\n  - https://a.test\n  - https://b.test\n")
            .expect("write");

        let registry = bootstrap_blocking(
            Some(&path),
            None,
            &portico_core::TracingNotifier,
            Arc::new(CannedSource { answers: HashMap::new() }),
        )
        .expect("bootstrap");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.current_url(), Some(&ProjectUrl::from("https://a.test")));
        assert!(registry.fetch_started());
        assert!(registry.records().iter().all(|r| !r.loading && r.error.is_some()));
    }
}
