use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::ConfigError;

/// Root configuration of the SUDS access layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SudsConfig {
    #[serde(default)]
    pub cache: CacheSettings,
    /// Remote service address and endpoint paths
    #[serde(default)]
    pub suds: ServiceSettings,
    /// Bulk comment count batching
    #[serde(default)]
    pub batching: BatchingSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

impl SudsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.suds.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::validation("suds.base_url must not be empty"));
        }
        Url::parse(base)
            .map_err(|e| ConfigError::validation(format!("suds.base_url is not a valid URL: {e}")))?;

        for (name, path) in self.suds.endpoints.paths() {
            if path.is_empty() {
                return Err(ConfigError::validation(format!(
                    "suds.endpoints.{name} must not be empty"
                )));
            }
            if !path.starts_with('/') {
                return Err(ConfigError::validation(format!(
                    "suds.endpoints.{name} must start with '/'"
                )));
            }
        }

        if self.batching.max_url_size == 0 {
            return Err(ConfigError::validation("batching.max_url_size must be > 0"));
        }
        if self.http.timeout_ms == 0 {
            return Err(ConfigError::validation("http.timeout_ms must be > 0"));
        }
        if self.cache.ttl_secs == Some(0) {
            return Err(ConfigError::validation(
                "cache.ttl_secs must be > 0 when set (omit it to keep entries until replaced)",
            ));
        }
        Ok(())
    }

    /// Whether the global cache switch is on. Session presence is checked by the gateway.
    pub fn cache_enabled(&self) -> bool {
        self.cache.enabled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Entry lifetime; `None` keeps entries until overwritten or removed.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl CacheSettings {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoints: EndpointsSettings,
}

fn default_base_url() -> String {
    "https://session-user-data.webservices.ft.com".to_string()
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: EndpointsSettings::default(),
        }
    }
}

impl ServiceSettings {
    /// Full URL of an endpoint path (base address without trailing slash + path).
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }

    pub fn init_url(&self) -> String {
        self.endpoint_url(&self.endpoints.livefyre.init)
    }

    pub fn comment_count_url(&self) -> String {
        self.endpoint_url(&self.endpoints.livefyre.comment_count)
    }

    pub fn comment_counts_url(&self) -> String {
        self.endpoint_url(&self.endpoints.livefyre.comment_counts)
    }

    pub fn get_auth_url(&self) -> String {
        self.endpoint_url(&self.endpoints.user.get_auth)
    }

    pub fn update_user_url(&self) -> String {
        self.endpoint_url(&self.endpoints.user.update_user)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EndpointsSettings {
    #[serde(default)]
    pub livefyre: LivefyreEndpoints,
    #[serde(default)]
    pub user: UserEndpoints,
}

impl EndpointsSettings {
    fn paths(&self) -> [(&'static str, &str); 5] {
        [
            ("livefyre.init", self.livefyre.init.as_str()),
            ("livefyre.comment_count", self.livefyre.comment_count.as_str()),
            ("livefyre.comment_counts", self.livefyre.comment_counts.as_str()),
            ("user.get_auth", self.user.get_auth.as_str()),
            ("user.update_user", self.user.update_user.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivefyreEndpoints {
    #[serde(default = "default_init_path")]
    pub init: String,
    #[serde(default = "default_comment_count_path")]
    pub comment_count: String,
    #[serde(default = "default_comment_counts_path")]
    pub comment_counts: String,
}

fn default_init_path() -> String {
    "/v1/livefyre/init".to_string()
}
fn default_comment_count_path() -> String {
    "/v1/livefyre/commentcount".to_string()
}
fn default_comment_counts_path() -> String {
    "/v1/livefyre/commentcounts".to_string()
}

impl Default for LivefyreEndpoints {
    fn default() -> Self {
        Self {
            init: default_init_path(),
            comment_count: default_comment_count_path(),
            comment_counts: default_comment_counts_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEndpoints {
    #[serde(default = "default_get_auth_path")]
    pub get_auth: String,
    #[serde(default = "default_update_user_path")]
    pub update_user: String,
}

fn default_get_auth_path() -> String {
    "/v1/user/getauth".to_string()
}
fn default_update_user_path() -> String {
    "/v1/user/updateuser".to_string()
}

impl Default for UserEndpoints {
    fn default() -> Self {
        Self {
            get_auth: default_get_auth_path(),
            update_user: default_update_user_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchingSettings {
    /// Approximate URL size after which a new bulk comment count batch is opened
    #[serde(default = "default_max_url_size")]
    pub max_url_size: usize,
}

fn default_max_url_size() -> usize {
    1000
}

impl Default for BatchingSettings {
    fn default() -> Self {
        Self {
            max_url_size: default_max_url_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
