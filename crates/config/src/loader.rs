//! Builder and environment loader for `ClientConfig`

use std::time::Duration;

use url::Url;
use webfs_core::{
    Error, Result, WEBFS_AUTH_VAR, WEBFS_CONNECT_TIMEOUT_VAR, WEBFS_READ_TIMEOUT_VAR,
    WEBFS_RENEWER_VAR, WEBFS_TOKEN_REFRESH_VAR, WEBFS_URI_VAR, WEBFS_USER_VAR,
};

use crate::config::{AuthMethod, ClientConfig, Scheme};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder that validates everything at `build` time
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    uri: Option<String>,
    user: Option<String>,
    auth_method: AuthMethod,
    token_refresh: Option<bool>,
    renewer: Option<String>,
    token_kind_override: Option<String>,
    token_service_override: Option<String>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filesystem URI, e.g. `webhdfs://namenode:50070`
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    /// Allow or forbid self-managed tokens. Defaults to whether security is enabled.
    pub fn token_refresh(mut self, enabled: bool) -> Self {
        self.token_refresh = Some(enabled);
        self
    }

    pub fn renewer(mut self, renewer: impl Into<String>) -> Self {
        self.renewer = Some(renewer.into());
        self
    }

    pub fn token_kind_override(mut self, kind: impl Into<String>) -> Self {
        self.token_kind_override = Some(kind.into());
        self
    }

    pub fn token_service_override(mut self, service: impl Into<String>) -> Self {
        self.token_service_override = Some(service.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Seed a builder from `WEBFS_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();
        if let Some(uri) = env_var(WEBFS_URI_VAR) {
            builder = builder.uri(uri);
        }
        if let Some(user) = env_var(WEBFS_USER_VAR).or_else(|| env_var("USER")) {
            builder = builder.user(user);
        }
        if let Some(auth) = env_var(WEBFS_AUTH_VAR) {
            builder = builder.auth_method(auth.parse()?);
        }
        if let Some(refresh) = env_var(WEBFS_TOKEN_REFRESH_VAR) {
            builder = builder.token_refresh(parse_bool(WEBFS_TOKEN_REFRESH_VAR, &refresh)?);
        }
        if let Some(renewer) = env_var(WEBFS_RENEWER_VAR) {
            builder = builder.renewer(renewer);
        }
        if let Some(secs) = env_var(WEBFS_CONNECT_TIMEOUT_VAR) {
            builder = builder.connect_timeout(parse_secs(WEBFS_CONNECT_TIMEOUT_VAR, &secs)?);
        }
        if let Some(secs) = env_var(WEBFS_READ_TIMEOUT_VAR) {
            builder = builder.read_timeout(parse_secs(WEBFS_READ_TIMEOUT_VAR, &secs)?);
        }
        Ok(builder)
    }

    pub fn build(self) -> Result<ClientConfig> {
        let raw = self
            .uri
            .ok_or_else(|| Error::configuration("no filesystem URI configured"))?;
        let uri = Url::parse(&raw)
            .map_err(|e| Error::configuration(format!("invalid filesystem URI '{raw}': {e}")))?;
        let scheme: Scheme = uri.scheme().parse()?;
        let host = uri
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::configuration(format!("filesystem URI '{raw}' has no host")))?
            .to_string();
        let port = uri.port().unwrap_or_else(|| scheme.default_port());

        let user = self
            .user
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::configuration("no user name configured"))?;

        let token_refresh = self
            .token_refresh
            .unwrap_or_else(|| self.auth_method.is_security_enabled());

        let config = ClientConfig {
            scheme,
            host,
            port,
            user,
            auth_method: self.auth_method,
            token_refresh,
            renewer: self.renewer,
            token_kind_override: self.token_kind_override,
            token_service_override: self.token_service_override,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
        };
        tracing::debug!(
            uri = %config.uri(),
            user = %config.user,
            auth = %config.auth_method,
            token_refresh = config.token_refresh,
            "client configuration built"
        );
        Ok(config)
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load configuration from `WEBFS_*` environment variables
    pub fn from_env() -> Result<Self> {
        ClientConfigBuilder::from_env()?.build()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{name} must be a boolean, got '{value}'"
        ))),
    }
}

fn parse_secs(name: &str, value: &str) -> Result<Duration> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::configuration(format!("{name} must be whole seconds, got '{value}'")))
}
