//! The blocking HTTP primitive.
//!
//! A [`Transport`] sends one [`Request`] and returns the response body, or the
//! error the server's answer maps to. It never retries. Attaching the token is
//! the transport's job only in the mechanical sense: whatever token the request
//! carries becomes the `delegation` parameter, and a request without one is
//! sent with `user.name`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use url::Url;
use webfs_config::ClientConfig;
use webfs_core::{
    Error, HttpMethod, Op, Result, ResultExt, Token, INVALID_TOKEN_EXCEPTION, PARAM_DELEGATION,
    PARAM_OP, PARAM_USER_NAME,
};

/// One remote operation request
#[derive(Debug, Clone)]
pub struct Request {
    pub op: Op,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Token sent as the `delegation` parameter
    pub delegation: Option<Arc<Token>>,
}

impl Request {
    pub fn new(op: Op, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            params: Vec::new(),
            body: None,
            delegation: None,
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Blocking remote-call primitive
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response>;
}

#[derive(Debug, Deserialize)]
struct RemoteExceptionEnvelope {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
struct RemoteException {
    #[serde(default)]
    exception: String,
    #[serde(default, rename = "javaClassName")]
    java_class_name: String,
    #[serde(default)]
    message: String,
}

impl RemoteException {
    fn is_invalid_token(&self) -> bool {
        self.exception == INVALID_TOKEN_EXCEPTION
            || self.java_class_name.ends_with("$InvalidToken")
            || self.java_class_name.ends_with(".InvalidToken")
    }
}

// Some servers wrap the token failure in a SecurityException raised while
// resolving the caller's identity.
const WRAPPED_IDENTITY_FAILURE: &str = "Failed to obtain user group information:";

/// Map a non-success answer to the error it represents
pub fn map_error_response(op: Op, endpoint: &str, user: &str, status: u16, body: &[u8]) -> Error {
    let remote = serde_json::from_slice::<RemoteExceptionEnvelope>(body)
        .ok()
        .map(|e| e.remote_exception);

    if status == 401 {
        let message = remote
            .map(|r| r.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "server requires authentication".to_string());
        return Error::authentication(user, message);
    }

    match remote {
        Some(remote) if status == 403 && remote.is_invalid_token() => {
            Error::invalid_token(remote.message)
        }
        Some(remote)
            if status == 403
                && remote.exception == "SecurityException"
                && remote.message.starts_with(WRAPPED_IDENTITY_FAILURE)
                && remote.message.contains(INVALID_TOKEN_EXCEPTION) =>
        {
            let inner = remote.message[WRAPPED_IDENTITY_FAILURE.len()..].trim();
            Error::invalid_token(inner)
        }
        Some(remote) => Error::remote(op.name(), status, remote.exception, remote.message),
        None => Error::transport(endpoint, format!("{op} returned HTTP {status}")),
    }
}

/// [`Transport`] over `reqwest`'s blocking client
pub struct HttpTransport {
    config: ClientConfig,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(Some(config.read_timeout).filter(|t| *t > Duration::ZERO))
            .user_agent(concat!("webfs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Full URL of `request`, auth parameters included
    pub fn url(&self, request: &Request) -> Result<Url> {
        let mut url = self.config.path_url(&request.path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(PARAM_OP, request.op.name());
            match &request.delegation {
                Some(token) => {
                    query.append_pair(PARAM_DELEGATION, &token.encode_url_string()?);
                }
                None => {
                    query.append_pair(PARAM_USER_NAME, &self.config.user);
                }
            }
            for (name, value) in &request.params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response> {
        let url = self.url(request)?;
        let endpoint = self.config.base_url();
        let method = match request.op.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        tracing::debug!(
            op = %request.op,
            path = %request.path,
            token = request.delegation.is_some(),
            "sending request"
        );

        let mut builder = self.client.request(method, url);
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(body.clone());
        }
        let response = builder.send().transport_context(&endpoint)?;
        let status = response.status().as_u16();
        let body = response.bytes().transport_context(&endpoint)?.to_vec();

        if status == request.op.expected_status() {
            return Ok(Response { status, body });
        }
        if (200..300).contains(&status) {
            return Err(Error::transport(
                endpoint,
                format!(
                    "{} returned HTTP {status}, expected {}",
                    request.op,
                    request.op.expected_status()
                ),
            ));
        }
        Err(map_error_response(
            request.op,
            &endpoint,
            &self.config.user,
            status,
            &body,
        ))
    }
}
