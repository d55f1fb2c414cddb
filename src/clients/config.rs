//! Configuration for the default HTTP caller.

use std::collections::HashMap;

use url::Url;

use crate::framework::HttpError;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "CRUD_STORE_BASE_URL";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    /// Relative request URLs (`/users`) are resolved against this.
    pub base_url: Option<Url>,
    /// Sent with every request.
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Ok(Self {
            base_url: Some(parse_base(base_url)?),
            headers: HashMap::new(),
        })
    }

    /// Reads `CRUD_STORE_BASE_URL`; no base URL when unset or empty.
    pub fn from_env() -> Result<Self, HttpError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::new(raw.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Resolve a request URL. Absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> Result<Url, HttpError> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| HttpError::InvalidUrl(format!("relative URL '{}' without base URL", url)))?;
        base.join(url.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))
    }
}

// A base without a trailing slash would drop its last path segment on join.
fn parse_base(raw: &str) -> Result<Url, HttpError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", raw, e)))
}
