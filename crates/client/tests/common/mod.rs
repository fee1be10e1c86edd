#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use webfs_client::{Request, Response, Transport, WebFsClient};
use webfs_config::{AuthMethod, ClientConfig};
use webfs_core::{Error, Op, Result, Token, TokenIdentifier, WEBHDFS_TOKEN_KIND};
use webfs_security::{IdentityContext, TokenAuthority};

pub const USER: &str = "DummyUser";
pub const URI: &str = "webhdfs://127.0.0.1:50070";
pub const SERVICE: &str = "127.0.0.1:50070";

/// In-memory name node acting as both token authority and transport.
///
/// Tokens are known by their identifier bytes. A token is accepted while it
/// is issued and neither cancelled nor expired.
pub struct FakeCluster {
    kind: String,
    service: String,
    sequence: AtomicU64,
    issued: Mutex<HashSet<Vec<u8>>>,
    revoked: Mutex<HashSet<Vec<u8>>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    sent: Mutex<Vec<Request>>,
    require_token: bool,
    fetch_delay: Duration,
    pub fetches: AtomicUsize,
    pub renewals: AtomicUsize,
    pub cancels: AtomicUsize,
}

impl FakeCluster {
    pub fn new() -> Arc<Self> {
        Self::build(WEBHDFS_TOKEN_KIND, SERVICE, true, Duration::ZERO)
    }

    /// A cluster that serves data requests without a token
    pub fn insecure() -> Arc<Self> {
        Self::build(WEBHDFS_TOKEN_KIND, SERVICE, false, Duration::ZERO)
    }

    /// A cluster tagging issued tokens with its own kind and service
    pub fn with_tags(kind: &str, service: &str) -> Arc<Self> {
        Self::build(kind, service, true, Duration::ZERO)
    }

    /// A cluster whose fetches take `delay`
    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::build(WEBHDFS_TOKEN_KIND, SERVICE, true, delay)
    }

    fn build(kind: &str, service: &str, require_token: bool, fetch_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            kind: kind.to_string(),
            service: service.to_string(),
            sequence: AtomicU64::new(1),
            issued: Mutex::new(HashSet::new()),
            revoked: Mutex::new(HashSet::new()),
            files: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            require_token,
            fetch_delay,
            fetches: AtomicUsize::new(0),
            renewals: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn renew_count(&self) -> usize {
        self.renewals.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Data requests seen so far
    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().clone()
    }

    /// Stop accepting `token` without a cancel call
    pub fn expire(&self, token: &Token) {
        self.revoked.lock().insert(token.identifier().to_vec());
    }

    /// A token this cluster never issued
    pub fn foreign_token(&self) -> Token {
        self.mint("SomeoneElse")
    }

    pub fn put_file(&self, path: &str, data: &[u8]) {
        self.files.lock().insert(path.to_string(), data.to_vec());
    }

    fn mint(&self, owner: &str) -> Token {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let identifier = TokenIdentifier::new(owner)
            .with_renewer(owner)
            .with_sequence_number(sequence)
            .with_dates(1_000, 86_400_000);
        Token::from_identifier(
            &identifier,
            sequence.to_be_bytes().to_vec(),
            self.kind.clone(),
            self.service.clone(),
        )
        .expect("identifier encodes")
    }

    fn check(&self, token: &Token) -> Result<()> {
        let id = token.identifier();
        if !self.issued.lock().contains(id) {
            return Err(Error::invalid_token("token can't be found in cache"));
        }
        if self.revoked.lock().contains(id) {
            return Err(Error::invalid_token("token is expired"));
        }
        Ok(())
    }

    fn not_found(&self, op: Op, path: &str) -> Error {
        Error::remote(
            op.name(),
            404,
            "FileNotFoundException",
            format!("File does not exist: {path}"),
        )
    }
}

impl TokenAuthority for FakeCluster {
    fn fetch(&self, _renewer: Option<&str>) -> Result<Token> {
        if !self.fetch_delay.is_zero() {
            std::thread::sleep(self.fetch_delay);
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let token = self.mint(USER);
        self.issued.lock().insert(token.identifier().to_vec());
        Ok(token)
    }

    fn renew(&self, token: &Token) -> Result<i64> {
        self.renewals.fetch_add(1, Ordering::SeqCst);
        self.check(token)?;
        Ok(86_400_000)
    }

    fn cancel(&self, token: &Token) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.check(token)?;
        self.revoked.lock().insert(token.identifier().to_vec());
        Ok(())
    }
}

impl Transport for FakeCluster {
    fn send(&self, request: &Request) -> Result<Response> {
        self.sent.lock().push(request.clone());

        match &request.delegation {
            Some(token) => self.check(token)?,
            None if self.require_token && request.op.requires_auth() => {
                return Err(Error::authentication(USER, "GSSException: no valid credentials"));
            }
            None => {}
        }

        let path = request.path.as_str();
        match request.op {
            Op::Open => match self.files.lock().get(path) {
                Some(data) => Ok(Response::new(200, data.clone())),
                None => Err(self.not_found(request.op, path)),
            },
            Op::Create => {
                let data = request.body.clone().unwrap_or_default();
                self.files.lock().insert(path.to_string(), data);
                Ok(Response::new(201, Vec::new()))
            }
            Op::GetFileStatus => match self.files.lock().get(path) {
                Some(data) => {
                    let body = serde_json::json!({
                        "FileStatus": {
                            "type": "FILE",
                            "length": data.len(),
                            "owner": USER,
                            "group": "supergroup",
                            "permission": "644",
                        }
                    });
                    Ok(Response::new(200, body.to_string()))
                }
                None => Err(self.not_found(request.op, path)),
            },
            Op::Mkdirs | Op::Delete | Op::Rename => {
                Ok(Response::new(200, r#"{"boolean":true}"#))
            }
            _ => Ok(Response::new(200, "{}")),
        }
    }
}

pub fn kerberos_config() -> ClientConfig {
    ClientConfig::builder()
        .uri(URI)
        .user(USER)
        .auth_method(AuthMethod::Kerberos)
        .build()
        .expect("valid config")
}

pub fn simple_config() -> ClientConfig {
    ClientConfig::builder()
        .uri(URI)
        .user(USER)
        .build()
        .expect("valid config")
}

pub fn identity(config: &ClientConfig) -> Arc<IdentityContext> {
    Arc::new(IdentityContext::new(config.user.clone(), config.auth_method))
}

/// A client wired to `cluster`, sharing `identity`
pub fn client_with(
    cluster: &Arc<FakeCluster>,
    config: ClientConfig,
    identity: Arc<IdentityContext>,
) -> WebFsClient {
    WebFsClient::with_parts(config, identity, cluster.clone(), cluster.clone())
        .expect("client builds")
}

/// A Kerberos client with an empty identity context
pub fn client(cluster: &Arc<FakeCluster>) -> WebFsClient {
    let config = kerberos_config();
    let identity = identity(&config);
    client_with(cluster, config, identity)
}
