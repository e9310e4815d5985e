//! Where the CLI sends its requests.
//!
//! Flags win over the environment; the environment (optionally loaded from a
//! `.env` file) wins over the built-in defaults.

use chemvision_core::config::ConfigError;
use chemvision_core::{BaseUrl, ChemVisionClient, RouteFamily, UrlContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: BaseUrl,
    pub routes: RouteFamily,
}

impl Settings {
    pub fn resolve(
        base_url: Option<String>,
        internal: bool,
        routes: Option<RouteFamily>,
    ) -> Result<Self, ConfigError> {
        let routes = match routes {
            Some(routes) => routes,
            None => RouteFamily::from_env()?,
        };
        let base_url = match base_url {
            Some(url) => BaseUrl::Fixed(url),
            None if internal => BaseUrl::Env(UrlContext::Internal),
            None => BaseUrl::Env(UrlContext::Public),
        };
        Ok(Self { base_url, routes })
    }

    pub fn client(&self) -> ChemVisionClient {
        ChemVisionClient::with_base_url(self.base_url.clone()).with_routes(self.routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win() {
        let settings = Settings::resolve(
            Some("http://10.0.0.5:8000".to_string()),
            true,
            Some(RouteFamily::Compact),
        )
        .unwrap();
        assert_eq!(settings.base_url, BaseUrl::Fixed("http://10.0.0.5:8000".to_string()));
        assert_eq!(settings.routes, RouteFamily::Compact);
        assert_eq!(settings.client().build_health().url, "http://10.0.0.5:8000/health");
    }

    #[test]
    fn internal_flag_selects_internal_context() {
        let settings = Settings::resolve(None, true, Some(RouteFamily::Hyphenated)).unwrap();
        assert_eq!(settings.base_url, BaseUrl::Env(UrlContext::Internal));
    }
}
