//! Fetching a project's public display metadata over HTTP.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use portico_core::{FetchError, ProjectInfo, ProjectUrl};

pub const USER_AGENT: &str = concat!("portico/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can answer "what is this project called, and what is its logo".
///
/// Calls block; the fan-out runs each one on `spawn_blocking`.
pub trait MetadataSource: Send + Sync {
    fn fetch(&self, url: &ProjectUrl) -> Result<ProjectInfo, FetchError>;
}

/// Body served by a project's root endpoint: `{ "data": { "api": { … } } }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    api: RawInfo,
}

/// `data.api` as served. The two fields are taken whatever their JSON type.
#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    project_name: Value,
    #[serde(default)]
    project_logo: Value,
}

impl From<RawInfo> for ProjectInfo {
    fn from(raw: RawInfo) -> Self {
        Self {
            project_name: display_value(raw.project_name),
            project_logo: display_value(raw.project_logo),
        }
    }
}

/// `null` → `None`, strings as-is, anything else in its JSON text form.
fn display_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// GETs the project URL and reads `data.api.project_name` / `project_logo`.
#[derive(Debug, Clone)]
pub struct HttpMetadataSource {
    agent: ureq::Agent,
}

impl HttpMetadataSource {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build();
        Self { agent }
    }
}

impl Default for HttpMetadataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSource for HttpMetadataSource {
    fn fetch(&self, url: &ProjectUrl) -> Result<ProjectInfo, FetchError> {
        let response = match self.agent.get(url.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(FetchError::Status { code }),
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Network(transport.to_string()))
            }
        };

        let code = response.status();
        if !(200..300).contains(&code) {
            return Err(FetchError::Status { code });
        }

        let body = response
            .into_string()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        decode_info(&body)
    }
}

/// Extract the display metadata from a response body.
pub fn decode_info(body: &str) -> Result<ProjectInfo, FetchError> {
    serde_json::from_str::<Envelope>(body)
        .map(|envelope| ProjectInfo::from(envelope.data.api))
        .map_err(|e| FetchError::Malformed(e.to_string()))
}
