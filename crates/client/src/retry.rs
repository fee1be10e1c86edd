//! Token attachment and the single replace-and-retry.
//!
//! Every remote call goes through [`RetryController::execute`]:
//!
//! 1. Operations exempt from auth are sent as they are; the cache is not touched.
//! 2. Otherwise the cache supplies a token (fetching or adopting only when empty).
//! 3. If the server rejects that token and this client owns it, the token is
//!    replaced and the request sent exactly once more. A second rejection, a
//!    rejection of a token owned by someone else, and every other failure
//!    propagate unchanged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use webfs_core::{Result, Token};
use webfs_security::TokenCache;

use crate::transport::{Request, Response, Transport};

pub struct RetryController {
    cache: Arc<TokenCache>,
    transport: Arc<dyn Transport>,
    retries: AtomicU64,
}

impl RetryController {
    pub fn new(cache: Arc<TokenCache>, transport: Arc<dyn Transport>) -> Self {
        Self {
            cache,
            transport,
            retries: AtomicU64::new(0),
        }
    }

    pub fn execute(&self, mut request: Request) -> Result<Response> {
        let span = tracing::debug_span!("webfs_op", op = %request.op, path = %request.path);
        let _entered = span.enter();

        if !request.op.requires_auth() {
            request.delegation = None;
            return self.transport.send(&request);
        }

        let token = self.token_for_request()?;
        request.delegation = token.clone();

        let err = match self.transport.send(&request) {
            Ok(response) => return Ok(response),
            Err(err) if err.is_invalid_token() => err,
            Err(err) => return Err(err),
        };

        let Some(rejected) = token else {
            return Err(err);
        };
        if !self.cache.refresh_enabled() {
            tracing::warn!(service = %self.cache.service(), error = %err, "token rejected; refresh is disabled");
            return Err(err);
        }

        // Ownership is decided by the cache under its own lock.
        let Some(fresh) = self.cache.replace(&rejected)? else {
            tracing::warn!(
                service = %self.cache.service(),
                error = %err,
                "token rejected; it is not owned by this client, so it is left in place"
            );
            return Err(err);
        };
        tracing::warn!(service = %self.cache.service(), error = %err, "token rejected, replaced");
        request.delegation = Some(fresh);
        self.retries.fetch_add(1, Ordering::Relaxed);
        self.transport.send(&request)
    }

    fn token_for_request(&self) -> Result<Option<Arc<Token>>> {
        if self.cache.refresh_enabled() {
            self.cache.acquire().map(Some)
        } else {
            Ok(self.cache.get())
        }
    }

    /// Requests sent a second time after a replacement
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }
}
