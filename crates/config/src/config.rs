//! Immutable client configuration
//!
//! `ClientConfig` is the single source of truth for how a client reaches the
//! name node and how it authenticates. It is `Clone + Send + Sync` and is never
//! mutated after construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;
use webfs_core::{
    Error, Result, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT, SWEBHDFS_SCHEME, SWEBHDFS_TOKEN_KIND,
    WEBHDFS_PREFIX, WEBHDFS_SCHEME, WEBHDFS_TOKEN_KIND,
};

/// Filesystem URI scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `webhdfs://`, plain HTTP
    WebHdfs,
    /// `swebhdfs://`, HTTPS
    SWebHdfs,
}

impl Scheme {
    /// Transport scheme used on the wire
    pub fn transport(&self) -> &'static str {
        match self {
            Scheme::WebHdfs => "http",
            Scheme::SWebHdfs => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::WebHdfs => DEFAULT_HTTP_PORT,
            Scheme::SWebHdfs => DEFAULT_HTTPS_PORT,
        }
    }

    /// Token kind compiled into the client for this scheme
    pub fn token_kind(&self) -> &'static str {
        match self {
            Scheme::WebHdfs => WEBHDFS_TOKEN_KIND,
            Scheme::SWebHdfs => SWEBHDFS_TOKEN_KIND,
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            WEBHDFS_SCHEME => Ok(Scheme::WebHdfs),
            SWEBHDFS_SCHEME => Ok(Scheme::SWebHdfs),
            other => Err(Error::configuration(format!(
                "unsupported scheme '{other}', expected '{WEBHDFS_SCHEME}' or '{SWEBHDFS_SCHEME}'"
            ))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::WebHdfs => f.write_str(WEBHDFS_SCHEME),
            Scheme::SWebHdfs => f.write_str(SWEBHDFS_SCHEME),
        }
    }
}

/// How the caller authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Trusted `user.name` parameter, no tokens
    #[default]
    Simple,
    /// Kerberos login; data-plane calls carry delegation tokens
    Kerberos,
}

impl AuthMethod {
    pub fn is_security_enabled(&self) -> bool {
        matches!(self, AuthMethod::Kerberos)
    }
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(AuthMethod::Simple),
            "kerberos" => Ok(AuthMethod::Kerberos),
            other => Err(Error::configuration(format!(
                "unknown authentication method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Simple => f.write_str("simple"),
            AuthMethod::Kerberos => f.write_str("kerberos"),
        }
    }
}

/// Immutable configuration of one client instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,

    /// Principal requests are made as
    pub user: String,

    pub auth_method: AuthMethod,

    /// Whether the client may fetch and replace its own tokens
    pub token_refresh: bool,

    /// Renewer named when the caller explicitly fetches a token
    pub renewer: Option<String>,

    /// Kind requested from the authority at issuance
    pub token_kind_override: Option<String>,

    /// Service requested from the authority at issuance
    pub token_service_override: Option<String>,

    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl ClientConfig {
    /// `<scheme>://<host>:<port>` of the name node
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme.transport(), self.host, self.port)
    }

    /// REST URL of `path`
    ///
    /// Each path component is added as its own segment, so characters such as
    /// `?`, `#` and `%` in a file name are percent-encoded rather than read as
    /// URL syntax.
    pub fn path_url(&self, path: &str) -> Result<Url> {
        let base = self.base_url();
        let mut url = Url::parse(&base)
            .map_err(|e| Error::configuration(format!("invalid name node URL '{base}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::configuration(format!("name node URL '{base}' cannot carry a path")))?
            .pop_if_empty()
            .extend(WEBHDFS_PREFIX.trim_start_matches('/').split('/'))
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    /// Service tag identifying tokens for this name node
    pub fn token_service(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Kind assumed for tokens whose kind the authority left empty
    pub fn default_token_kind(&self) -> &'static str {
        self.scheme.token_kind()
    }

    /// Filesystem URI this configuration was built from
    pub fn uri(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}
