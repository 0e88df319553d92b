//! Base-URL normalization for registry servers.

use ::url::Url;

use crate::{EurekaError, Result};

/// Default API root appended when a base URL has no path.
pub const DEFAULT_BASE_PATH: &str = "/eureka/v2";

/// Canonicalize a registry base URL into a fully qualified API root.
///
/// A bare host gets the default `/eureka/v2` root, a `/eureka` path gets
/// `/v2` appended, and any other path is trusted as-is. The result never
/// ends in a slash, and normalizing an already-normalized URL returns it
/// unchanged.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| EurekaError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(EurekaError::InvalidUrl {
            url: base_url.to_string(),
            reason: "base URL must include scheme and host".to_string(),
        });
    }

    let path = url.path().trim_end_matches('/').to_string();
    if path.eq_ignore_ascii_case(DEFAULT_BASE_PATH) {
        url.set_path(&path);
    } else if path.eq_ignore_ascii_case("/eureka") {
        url.set_path(&format!("{path}/v2"));
    } else if path.is_empty() {
        url.set_path(DEFAULT_BASE_PATH);
    } else {
        // Custom path, caller takes responsibility.
        url.set_path(&path);
    }

    Ok(url.to_string())
}
