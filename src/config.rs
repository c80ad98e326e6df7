//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Which of the two block-toggle endpoints the backend should be called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockEndpoint {
    /// `PATCH /admin/stylists/{stylistId}/block` with `{isBlocked}`.
    #[default]
    Patch,
    /// `POST /admin/stylists/{userId}/block` with `{block}`.
    Legacy,
}

impl std::str::FromStr for BlockEndpoint {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(Self::Patch),
            "legacy" | "post" => Ok(Self::Legacy),
            other => Err(format!("Unknown block endpoint: {other}")),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://salon.example.com/api`. No trailing slash.
    pub base_url: String,
    /// Bearer token sent on every request, if set.
    pub auth_token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Default `limit` for paginated list requests.
    pub page_size: u32,
    /// Endpoint used for block / unblock.
    pub block_endpoint: BlockEndpoint,
}

impl ClientConfig {
    /// Create a config with defaults for everything except the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
            timeout: Duration::from_secs(30),
            page_size: 10,
            block_endpoint: BlockEndpoint::default(),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("STYLIST_API_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("STYLIST_API_BASE_URL".into()))?;

        let mut config = Self::new(base_url.trim());

        config.auth_token = lookup("STYLIST_API_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        if let Some(raw) = lookup("STYLIST_API_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "STYLIST_API_TIMEOUT_SECS".into(),
                message: format!("expected whole seconds, got {raw:?}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("STYLIST_PAGE_SIZE") {
            let size: u32 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "STYLIST_PAGE_SIZE".into(),
                message: format!("expected a positive integer, got {raw:?}"),
            })?;
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "STYLIST_PAGE_SIZE".into(),
                    message: "must be at least 1".into(),
                });
            }
            config.page_size = size;
        }

        if let Some(raw) = lookup("STYLIST_BLOCK_ENDPOINT") {
            config.block_endpoint =
                raw.parse::<BlockEndpoint>()
                    .map_err(|message| ConfigError::InvalidValue {
                        key: "STYLIST_BLOCK_ENDPOINT".into(),
                        message,
                    })?;
        }

        Ok(config)
    }
}
