//! Query-string access for the page/request URL.

use std::collections::HashMap;

use url::Url;

use crate::types::ProjectUrl;

/// Query parameter naming the project a link wants to open.
pub const PROJECT_PARAM: &str = "project";

/// Decode the query string of `location` into a name → value map.
///
/// Relative locations (`/admin/?project=…`) are accepted. Values are
/// percent-decoded; when a name repeats, the last value wins. An unparseable
/// location yields an empty map.
pub fn query_params(location: &str) -> HashMap<String, String> {
    let base = Url::parse("http://localhost/").ok();
    let parsed = Url::options().base_url(base.as_ref()).parse(location);
    match parsed {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(err) => {
            tracing::debug!(location, error = %err, "ignoring unparseable location");
            HashMap::new()
        }
    }
}

/// The project requested through `?project=`, if any. Empty values count as absent.
pub fn requested_project(location: &str) -> Option<ProjectUrl> {
    query_params(location)
        .remove(PROJECT_PARAM)
        .filter(|value| !value.is_empty())
        .map(ProjectUrl::from)
}
