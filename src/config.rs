//! Console configuration, loaded once at start-up and injected everywhere else.
//!
//! | Variable                | Required | Description                             |
//! |-------------------------|----------|-----------------------------------------|
//! | `BASE_URL`              | yes      | REST base URL; `http:` becomes `https:` |
//! | `ADMIN_TOKEN`           | yes      | Bearer credential                       |
//! | `SPORT_CLUB_URL`        | yes      | Club endpoint suffix                    |
//! | `EVENT_URL`             | yes      | Event endpoint suffix                   |
//! | `NEWS_URL`              | yes      | News endpoint suffix                    |
//! | `BASE_IMAGE_UPLOAD_URL` | yes      | Multipart image upload endpoint         |
//! | `BASE_IMAGE_URL`        | yes      | Prefix for image preview URLs           |
//! | `REQUEST_TIMEOUT_SECS`  | no       | Per-request timeout; unset means none   |

use std::time::Duration;

use crate::model::EntityKind;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    /// A URL variable does not parse.
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// `REQUEST_TIMEOUT_SECS` is not a whole number of seconds.
    #[error("REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Endpoint suffixes appended to the base URL, one per entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub club: String,
    pub event: String,
    pub news: String,
}

/// Everything the REST client and editor sessions need to talk to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST base URL, used verbatim. Loaders apply the `https:` upgrade.
    pub base_url: String,
    pub admin_token: String,
    pub endpoints: Endpoints,
    pub image_upload_url: String,
    pub image_base_url: String,
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let required_url = |var: &'static str| -> Result<String, ConfigError> {
            let value = required(var)?;
            url::Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { var, source })?;
            Ok(value)
        };

        let base_url = upgrade_to_https(&required_url("BASE_URL")?);
        let admin_token = required("ADMIN_TOKEN")?;
        let endpoints = Endpoints {
            club: required("SPORT_CLUB_URL")?,
            event: required("EVENT_URL")?,
            news: required("NEWS_URL")?,
        };
        let image_upload_url = required_url("BASE_IMAGE_UPLOAD_URL")?;
        let image_base_url = required("BASE_IMAGE_URL")?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            base_url,
            admin_token,
            endpoints,
            image_upload_url,
            image_base_url,
            request_timeout,
        })
    }

    /// Endpoint suffix for an entity kind.
    pub fn endpoint(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Club => &self.endpoints.club,
            EntityKind::Event => &self.endpoints.event,
            EntityKind::News => &self.endpoints.news,
        }
    }

    /// `{base}{endpoint}`, the create target.
    pub fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}{}", self.base_url, self.endpoint(kind))
    }

    /// `{base}{endpoint}{id}/`, the update and fetch target.
    pub fn record_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}{}/", self.collection_url(kind), id)
    }

    /// `{image_base}{file_id}`.
    pub fn preview_url(&self, file_id: &str) -> String {
        format!("{}{}", self.image_base_url, file_id)
    }
}

/// Rewrites a leading `http:` scheme to `https:`.
pub fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("BASE_URL", "http://api.example"),
            ("ADMIN_TOKEN", "secret"),
            ("SPORT_CLUB_URL", "/api/v1/sport_clubs/"),
            ("EVENT_URL", "/api/v1/events/"),
            ("NEWS_URL", "/api/v1/news/"),
            ("BASE_IMAGE_UPLOAD_URL", "https://files.example/upload"),
            ("BASE_IMAGE_URL", "https://cdn.example/"),
        ])
    }

    fn load(vars: &HashMap<String, String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn loads_full_environment() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.base_url, "https://api.example");
        assert_eq!(config.admin_token, "secret");
        assert_eq!(config.endpoint(EntityKind::Event), "/api/v1/events/");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn https_base_is_left_alone() {
        let mut vars = full_env();
        vars.insert("BASE_URL".into(), "https://api.example".into());
        assert_eq!(load(&vars).unwrap().base_url, "https://api.example");
    }

    #[test]
    fn missing_variable_is_named() {
        let mut vars = full_env();
        vars.remove("ADMIN_TOKEN");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ADMIN_TOKEN")));
        assert_eq!(err.to_string(), "ADMIN_TOKEN environment variable is required");
    }

    #[test]
    fn blank_variable_counts_as_missing() {
        let mut vars = full_env();
        vars.insert("NEWS_URL".into(), "  ".into());
        assert!(matches!(load(&vars), Err(ConfigError::Missing("NEWS_URL"))));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let mut vars = full_env();
        vars.insert("BASE_IMAGE_UPLOAD_URL".into(), "not a url".into());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidUrl {
                var: "BASE_IMAGE_UPLOAD_URL",
                ..
            })
        ));
    }

    #[test]
    fn timeout_parses_seconds() {
        let mut vars = full_env();
        vars.insert("REQUEST_TIMEOUT_SECS".into(), "15".into());
        assert_eq!(
            load(&vars).unwrap().request_timeout,
            Some(Duration::from_secs(15))
        );

        vars.insert("REQUEST_TIMEOUT_SECS".into(), "soon".into());
        assert!(matches!(load(&vars), Err(ConfigError::InvalidTimeout(_))));
    }

    #[test]
    fn url_composition() {
        let config = load(&full_env()).unwrap();
        assert_eq!(
            config.collection_url(EntityKind::Club),
            "https://api.example/api/v1/sport_clubs/"
        );
        assert_eq!(
            config.record_url(EntityKind::News, "42"),
            "https://api.example/api/v1/news/42/"
        );
        assert_eq!(
            config.preview_url("abc123.png"),
            "https://cdn.example/abc123.png"
        );
    }

    #[test]
    fn upgrade_only_touches_the_scheme() {
        assert_eq!(upgrade_to_https("http://a/http:b"), "https://a/http:b");
        assert_eq!(upgrade_to_https("https://a"), "https://a");
        assert_eq!(upgrade_to_https("ftp://a"), "ftp://a");
    }
}
