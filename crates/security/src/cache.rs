//! Per-client token cache.
//!
//! One cell per client instance holds at most one token together with a
//! `self_managed` flag. The flag is true only for tokens this client fetched
//! itself, and it alone decides whether a token may be replaced after a
//! rejection or cancelled when the client closes. Adopted (ambient) and
//! injected tokens belong to someone else and are never mutated.
//!
//! The cell lock is held only across the cache decision. Fetches are
//! serialized on a separate lock so that concurrent callers on an empty cache
//! fetch once, while callers that already have a token never wait on the
//! authority.
//!
//! Once closed, the cache stores nothing it fetches. A fetch that was already
//! in flight when `close` ran has its token cancelled instead.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use webfs_core::{Error, Result, Token};

use crate::authority::TokenAuthority;
use crate::identity::IdentityContext;

#[derive(Debug, Default)]
struct Cell {
    token: Option<Arc<Token>>,
    self_managed: bool,
    closed: bool,
}

/// Counters of cache transitions since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Tokens fetched by `acquire` on an empty cell
    pub fetches: u64,
    /// Ambient tokens adopted from the identity context
    pub adoptions: u64,
    /// Tokens fetched by `replace`
    pub replacements: u64,
}

pub struct TokenCache {
    service: String,
    identity: Arc<IdentityContext>,
    authority: Arc<dyn TokenAuthority>,
    refresh_enabled: bool,
    cell: Mutex<Cell>,
    fetch_lock: Mutex<()>,
    fetches: AtomicU64,
    adoptions: AtomicU64,
    replacements: AtomicU64,
}

impl TokenCache {
    /// Create an empty cache for tokens of `service`.
    ///
    /// With `refresh_enabled` false the cache never fetches or adopts; only
    /// tokens injected through `set` are served.
    pub fn new(
        service: impl Into<String>,
        identity: Arc<IdentityContext>,
        authority: Arc<dyn TokenAuthority>,
        refresh_enabled: bool,
    ) -> Self {
        Self {
            service: service.into(),
            identity,
            authority,
            refresh_enabled,
            cell: Mutex::new(Cell::default()),
            fetch_lock: Mutex::new(()),
            fetches: AtomicU64::new(0),
            adoptions: AtomicU64::new(0),
            replacements: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn refresh_enabled(&self) -> bool {
        self.refresh_enabled
    }

    /// Current token, without side effects
    pub fn get(&self) -> Option<Arc<Token>> {
        self.cell.lock().token.clone()
    }

    /// Whether the current token was fetched by this client
    pub fn is_self_managed(&self) -> bool {
        let cell = self.cell.lock();
        cell.token.is_some() && cell.self_managed
    }

    /// Overwrite the cell unconditionally
    pub fn set(&self, token: Arc<Token>, self_managed: bool) {
        tracing::debug!(
            service = %self.service,
            kind = %token.kind(),
            self_managed,
            "token cache updated"
        );
        let mut cell = self.cell.lock();
        cell.token = Some(token);
        cell.self_managed = self_managed;
    }

    /// Stop fetching and hand back the token if this client owns it.
    ///
    /// A token owned by someone else stays in place and `None` is returned.
    /// Later `acquire` and `replace` calls fail with `Error::Closed`.
    pub fn close(&self) -> Option<Arc<Token>> {
        let mut cell = self.cell.lock();
        cell.closed = true;
        if !cell.self_managed {
            return None;
        }
        cell.self_managed = false;
        cell.token.take()
    }

    pub fn is_closed(&self) -> bool {
        self.cell.lock().closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Store a token this cache just fetched, unless it was closed meanwhile
    fn store_fetched(&self, token: Arc<Token>) -> Result<Arc<Token>> {
        {
            let mut cell = self.cell.lock();
            if !cell.closed {
                cell.token = Some(token.clone());
                cell.self_managed = true;
                tracing::debug!(service = %self.service, kind = %token.kind(), "fetched token cached");
                return Ok(token);
            }
        }
        tracing::info!(service = %self.service, "cache closed during fetch, cancelling new token");
        self.authority.cancel(&token)?;
        Err(Error::Closed)
    }

    /// Cached token, else an ambient token for this service, else a new one
    pub fn acquire(&self) -> Result<Arc<Token>> {
        self.ensure_open()?;
        if let Some(token) = self.get() {
            return Ok(token);
        }
        if !self.refresh_enabled {
            return Err(Error::configuration(format!(
                "no token cached for '{}' and token refresh is disabled",
                self.service
            )));
        }

        let _fetching = self.fetch_lock.lock();
        self.ensure_open()?;
        // Another caller may have filled the cell while we waited.
        if let Some(token) = self.get() {
            return Ok(token);
        }

        if let Some(ambient) = self.identity.token_for_service(&self.service) {
            tracing::info!(
                service = %self.service,
                principal = %self.identity.principal(),
                "adopting ambient token from identity context"
            );
            self.set(ambient.clone(), false);
            self.adoptions.fetch_add(1, Ordering::Relaxed);
            return Ok(ambient);
        }

        tracing::info!(service = %self.service, "fetching delegation token");
        let token = self.store_fetched(Arc::new(self.authority.fetch(None)?))?;
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(token)
    }

    /// Fetch a fresh token in place of `rejected`.
    ///
    /// Returns `None` without contacting the authority unless the cell holds a
    /// self-managed token; the ownership check and the swap happen under the
    /// same fetch lock. The identity context is not consulted. If another
    /// caller already swapped `rejected` for a new self-managed token, that
    /// token is returned instead of fetching again.
    pub fn replace(&self, rejected: &Arc<Token>) -> Result<Option<Arc<Token>>> {
        let _fetching = self.fetch_lock.lock();
        {
            let cell = self.cell.lock();
            if cell.closed {
                return Err(Error::Closed);
            }
            if !cell.self_managed {
                tracing::debug!(service = %self.service, "not replacing a token this client does not own");
                return Ok(None);
            }
            if let Some(current) = &cell.token {
                if !Arc::ptr_eq(current, rejected) {
                    return Ok(Some(current.clone()));
                }
            }
        }

        tracing::info!(service = %self.service, "replacing expired delegation token");
        let token = self.store_fetched(Arc::new(self.authority.fetch(None)?))?;
        self.replacements.fetch_add(1, Ordering::Relaxed);
        Ok(Some(token))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches: self.fetches.load(Ordering::Relaxed),
            adoptions: self.adoptions.load(Ordering::Relaxed),
            replacements: self.replacements.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self.cell.lock();
        f.debug_struct("TokenCache")
            .field("service", &self.service)
            .field("refresh_enabled", &self.refresh_enabled)
            .field("token", &cell.token)
            .field("self_managed", &cell.self_managed)
            .field("closed", &cell.closed)
            .finish()
    }
}
