//! Backend location and route layout.
//!
//! The base URL is resolved every time a request is built, so a changed
//! environment is picked up without rebuilding the client.

use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Public-facing backend URL, preferred in every context.
pub const PUBLIC_API_URL_VAR: &str = "CHEMVISION_PUBLIC_API_URL";

/// Internal-network backend URL, preferred in server-side contexts.
pub const INTERNAL_API_URL_VAR: &str = "CHEMVISION_API_URL";

/// Selects the route family (`hyphenated` or `compact`).
pub const ROUTES_VAR: &str = "CHEMVISION_API_ROUTES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown route family {0:?} (expected \"hyphenated\" or \"compact\")")]
    UnknownRouteFamily(String),
}

/// The backend operations this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ImageToStructure,
    NameToStructure,
    StructureToName,
    Health,
}

/// The two route layouts deployed backends have used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteFamily {
    /// `/api/image-to-structure`, `/api/name-to-structure`, `/api/structure-to-name`
    #[default]
    Hyphenated,
    /// `/api/ocsr`, `/api/name2structure`, `/api/structure2name`
    Compact,
}

impl RouteFamily {
    pub fn path(self, endpoint: Endpoint) -> &'static str {
        match (self, endpoint) {
            (_, Endpoint::Health) => "/health",
            (RouteFamily::Hyphenated, Endpoint::ImageToStructure) => "/api/image-to-structure",
            (RouteFamily::Hyphenated, Endpoint::NameToStructure) => "/api/name-to-structure",
            (RouteFamily::Hyphenated, Endpoint::StructureToName) => "/api/structure-to-name",
            (RouteFamily::Compact, Endpoint::ImageToStructure) => "/api/ocsr",
            (RouteFamily::Compact, Endpoint::NameToStructure) => "/api/name2structure",
            (RouteFamily::Compact, Endpoint::StructureToName) => "/api/structure2name",
        }
    }

    /// Route family from `CHEMVISION_API_ROUTES`, default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match non_empty(env::var(ROUTES_VAR).ok()) {
            Some(value) => value.parse(),
            None => Ok(RouteFamily::default()),
        }
    }
}

impl FromStr for RouteFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hyphenated" => Ok(RouteFamily::Hyphenated),
            "compact" => Ok(RouteFamily::Compact),
            _ => Err(ConfigError::UnknownRouteFamily(s.to_string())),
        }
    }
}

impl fmt::Display for RouteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteFamily::Hyphenated => f.write_str("hyphenated"),
            RouteFamily::Compact => f.write_str("compact"),
        }
    }
}

/// Where the caller runs, which decides the URL preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlContext {
    #[default]
    Public,
    Internal,
}

/// How a client finds its backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    Fixed(String),
    Env(UrlContext),
}

impl BaseUrl {
    /// The base URL to use for the next request, without a trailing slash.
    pub fn resolve(&self) -> String {
        let url = match self {
            BaseUrl::Fixed(url) => url.clone(),
            BaseUrl::Env(context) => resolve_base_url(*context, |key| env::var(key).ok()),
        };
        url.trim_end_matches('/').to_string()
    }
}

/// Pick a base URL for `context` from the variables `lookup` knows about.
pub fn resolve_base_url<F>(context: UrlContext, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let public = non_empty(lookup(PUBLIC_API_URL_VAR));
    let chosen = match context {
        UrlContext::Public => public,
        UrlContext::Internal => non_empty(lookup(INTERNAL_API_URL_VAR)).or(public),
    };
    chosen.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
