use std::time::Duration;

use crate::error::GatewayError;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the desk backend.
///
/// The credential is passed in explicitly; nothing here reads ambient
/// browser or process state beyond [`GatewayConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// | Env Var                         | Default  |
    /// |---------------------------------|----------|
    /// | `DESKPLAN_API_URL`              | required |
    /// | `DESKPLAN_API_TOKEN`            | unset    |
    /// | `DESKPLAN_REQUEST_TIMEOUT_SECS` | `30`     |
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` uses the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("DESKPLAN_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| GatewayError::Config("DESKPLAN_API_URL must be set".into()))?;

        let auth_token = lookup("DESKPLAN_API_TOKEN").filter(|v| !v.trim().is_empty());

        let request_timeout_secs = match lookup("DESKPLAN_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                GatewayError::Config(format!(
                    "DESKPLAN_REQUEST_TIMEOUT_SECS must be a valid u64, got '{raw}'"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let mut config = Self::new(base_url);
        config.auth_token = auth_token;
        config.request_timeout_secs = request_timeout_secs;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config = GatewayConfig::from_lookup(lookup(&[("DESKPLAN_API_URL", "http://api.local/")])).unwrap();
        assert_eq!(config.base_url, "http://api.local");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = GatewayConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DESKPLAN_API_URL"));
    }

    #[test]
    fn token_and_timeout_are_read() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("DESKPLAN_API_URL", "http://api.local"),
            ("DESKPLAN_API_TOKEN", "secret"),
            ("DESKPLAN_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let result = GatewayConfig::from_lookup(lookup(&[
            ("DESKPLAN_API_URL", "http://api.local"),
            ("DESKPLAN_REQUEST_TIMEOUT_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }
}
