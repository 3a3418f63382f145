// Endpoint normalization
//
// Users type addresses like `192.168.1.5:5000`; the gateway needs a base
// URL with a scheme and a trailing slash so relative API paths join under
// it instead of replacing the last segment.

use url::Url;

use crate::error::Error;

/// Endpoint dialed when nothing usable is stored.
pub const DEFAULT_ENDPOINT: &str = "http://100.103.184.90:5000/";

/// Normalize a user-entered endpoint.
///
/// Trims surrounding whitespace, prepends `http://` when neither
/// `http://` nor `https://` is present, and appends a trailing `/`.
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Resolve the stored endpoint into the base URL the gateway dials.
///
/// Absent or blank input falls back to [`DEFAULT_ENDPOINT`].
pub fn resolve(stored: Option<&str>) -> Result<Url, Error> {
    let raw = match stored {
        Some(s) if !s.trim().is_empty() => s,
        _ => DEFAULT_ENDPOINT,
    };
    parse_base(raw)
}

/// Validate a user-entered endpoint without touching any state.
pub fn parse_base(raw: &str) -> Result<Url, Error> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidEndpoint {
            endpoint: raw.to_owned(),
            reason: "endpoint is empty".into(),
        });
    }

    let normalized = normalize(raw);
    let url = Url::parse(&normalized).map_err(|e| Error::InvalidEndpoint {
        endpoint: raw.to_owned(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidEndpoint {
            endpoint: raw.to_owned(),
            reason: "missing host".into(),
        });
    }

    Ok(url)
}
