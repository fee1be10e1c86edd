//! The filesystem client.
//!
//! A `WebFsClient` owns exactly one token cache. Data-plane calls go through
//! the retry controller; the explicit token calls (`get_delegation_token`,
//! `renew_delegation_token`, `cancel_delegation_token`) talk to the authority
//! directly and never read or write the cache.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use webfs_config::ClientConfig;
use webfs_core::{Error, Op, Result, Token};
use webfs_security::{IdentityContext, TokenAuthority, TokenCache};

use crate::authority::HttpTokenAuthority;
use crate::retry::RetryController;
use crate::shutdown;
use crate::transport::{HttpTransport, Request, Response, Transport};
use crate::types::{
    BooleanEnvelope, ContentSummary, ContentSummaryEnvelope, FileStatus, FileStatusEnvelope,
    FileStatusesEnvelope, PathEnvelope,
};

/// Token activity of one client since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStats {
    pub fetches: u64,
    pub adoptions: u64,
    pub replacements: u64,
    pub retries: u64,
}

pub struct WebFsClient {
    config: ClientConfig,
    identity: Arc<IdentityContext>,
    authority: Arc<dyn TokenAuthority>,
    cache: Arc<TokenCache>,
    controller: RetryController,
    closed: AtomicBool,
}

impl WebFsClient {
    /// Build a client talking HTTP(S) to the configured name node
    pub fn connect(config: ClientConfig, identity: Arc<IdentityContext>) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
        let authority = Arc::new(HttpTokenAuthority::new(config.clone(), transport.clone()));
        Self::with_parts(config, identity, authority, transport)
    }

    /// Build a client from explicit collaborators
    pub fn with_parts(
        config: ClientConfig,
        identity: Arc<IdentityContext>,
        authority: Arc<dyn TokenAuthority>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        if identity.principal() != config.user {
            return Err(Error::configuration(format!(
                "identity principal '{}' does not match configured user '{}'",
                identity.principal(),
                config.user
            )));
        }
        if identity.auth_method() != config.auth_method {
            return Err(Error::configuration(format!(
                "identity authenticated with {} but client is configured for {}",
                identity.auth_method(),
                config.auth_method
            )));
        }

        let cache = Arc::new(TokenCache::new(
            config.token_service(),
            identity.clone(),
            authority.clone(),
            config.token_refresh,
        ));
        let controller = RetryController::new(cache.clone(), transport);
        tracing::debug!(uri = %config.uri(), user = %config.user, "client created");

        Ok(Self {
            config,
            identity,
            authority,
            cache,
            controller,
            closed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn identity(&self) -> &Arc<IdentityContext> {
        &self.identity
    }

    /// Kind of tokens this client fetches unless the authority says otherwise
    pub fn token_kind(&self) -> &str {
        self.config.default_token_kind()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Send a raw request through the retry controller
    pub fn execute(&self, request: Request) -> Result<Response> {
        self.ensure_open()?;
        self.controller.execute(request)
    }

    // Token management

    /// The token authorized calls would use, fetching or adopting one if needed.
    ///
    /// Returns `None` only when token refresh is disabled and nothing was injected.
    pub fn delegation_token(&self) -> Result<Option<Arc<Token>>> {
        self.ensure_open()?;
        if self.cache.refresh_enabled() {
            self.cache.acquire().map(Some)
        } else {
            Ok(self.cache.get())
        }
    }

    /// Currently cached token, without side effects
    pub fn cached_token(&self) -> Option<Arc<Token>> {
        self.cache.get()
    }

    /// Whether the cached token was fetched by this client
    pub fn owns_cached_token(&self) -> bool {
        self.cache.is_self_managed()
    }

    /// Use `token` for authorized calls. It stays owned by the caller: it is
    /// never replaced automatically and never cancelled on close.
    pub fn set_delegation_token(&self, token: Arc<Token>) {
        self.cache.set(token, false);
    }

    /// Issue a new token without touching the cache
    pub fn get_delegation_token(&self, renewer: Option<&str>) -> Result<Token> {
        self.ensure_open()?;
        self.authority.fetch(renewer)
    }

    /// Renew `token`, returning its new expiry in milliseconds since the epoch
    pub fn renew_delegation_token(&self, token: &Token) -> Result<i64> {
        self.ensure_open()?;
        self.authority.renew(token)
    }

    pub fn cancel_delegation_token(&self, token: &Token) -> Result<()> {
        self.ensure_open()?;
        self.authority.cancel(token)
    }

    /// Renew the cached token if this client owns it
    pub fn renew_cached_token(&self) -> Result<Option<i64>> {
        self.ensure_open()?;
        match self.cache.get() {
            Some(token) if self.cache.is_self_managed() => {
                self.authority.renew(&token).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn token_stats(&self) -> TokenStats {
        let cache = self.cache.stats();
        TokenStats {
            fetches: cache.fetches,
            adoptions: cache.adoptions,
            replacements: cache.replacements,
            retries: self.controller.retries(),
        }
    }

    /// Close the client, cancelling its own token.
    ///
    /// Only the first call does anything; later calls return `Ok(())`.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::debug!(uri = %self.config.uri(), "closing client");
        shutdown::relinquish(&self.cache, self.authority.as_ref()).map(|_| ())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // Filesystem operations

    pub fn open(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.execute(Request::new(Op::Open, path))?.body)
    }

    pub fn create(&self, path: &str, data: &[u8], overwrite: bool) -> Result<()> {
        let request = Request::new(Op::Create, path)
            .param("overwrite", overwrite)
            .body(data.to_vec());
        self.execute(request)?;
        Ok(())
    }

    pub fn append(&self, path: &str, data: &[u8]) -> Result<()> {
        self.execute(Request::new(Op::Append, path).body(data.to_vec()))?;
        Ok(())
    }

    pub fn mkdirs(&self, path: &str) -> Result<bool> {
        let envelope: BooleanEnvelope = self.execute(Request::new(Op::Mkdirs, path))?.json()?;
        Ok(envelope.boolean)
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<bool> {
        let request = Request::new(Op::Rename, from).param("destination", to);
        let envelope: BooleanEnvelope = self.execute(request)?.json()?;
        Ok(envelope.boolean)
    }

    pub fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        let request = Request::new(Op::Delete, path).param("recursive", recursive);
        let envelope: BooleanEnvelope = self.execute(request)?.json()?;
        Ok(envelope.boolean)
    }

    pub fn set_permission(&self, path: &str, permission: &str) -> Result<()> {
        self.execute(Request::new(Op::SetPermission, path).param("permission", permission))?;
        Ok(())
    }

    pub fn set_replication(&self, path: &str, replication: u16) -> Result<bool> {
        let request = Request::new(Op::SetReplication, path).param("replication", replication);
        let envelope: BooleanEnvelope = self.execute(request)?.json()?;
        Ok(envelope.boolean)
    }

    pub fn get_file_status(&self, path: &str) -> Result<FileStatus> {
        let envelope: FileStatusEnvelope =
            self.execute(Request::new(Op::GetFileStatus, path))?.json()?;
        Ok(envelope.file_status)
    }

    pub fn list_status(&self, path: &str) -> Result<Vec<FileStatus>> {
        let envelope: FileStatusesEnvelope =
            self.execute(Request::new(Op::ListStatus, path))?.json()?;
        Ok(envelope.file_statuses.file_status)
    }

    pub fn get_content_summary(&self, path: &str) -> Result<ContentSummary> {
        let envelope: ContentSummaryEnvelope =
            self.execute(Request::new(Op::GetContentSummary, path))?.json()?;
        Ok(envelope.content_summary)
    }

    pub fn get_home_directory(&self) -> Result<String> {
        let envelope: PathEnvelope =
            self.execute(Request::new(Op::GetHomeDirectory, "/"))?.json()?;
        Ok(envelope.path)
    }
}

impl std::fmt::Debug for WebFsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebFsClient")
            .field("uri", &self.config.uri())
            .field("user", &self.config.user)
            .field("cache", &self.cache)
            .field("closed", &self.is_closed())
            .finish()
    }
}
