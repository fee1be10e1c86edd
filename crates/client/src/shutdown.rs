//! Relinquishing the client's token on close.

use webfs_core::Result;
use webfs_security::{TokenAuthority, TokenCache};

/// Close the cache and cancel its token if this client fetched it.
///
/// Returns whether a cancel call was made. Adopted or injected tokens stay in
/// the cache untouched; their owner decides when they end. The cell is emptied
/// before the round trip, so a failed cancel still leaves the client without
/// a token. A fetch still in flight cancels its own token when it returns.
pub fn relinquish(cache: &TokenCache, authority: &dyn TokenAuthority) -> Result<bool> {
    match cache.close() {
        Some(token) => {
            tracing::info!(service = %cache.service(), "cancelling delegation token on close");
            authority.cancel(&token)?;
            Ok(true)
        }
        None => {
            tracing::debug!(
                service = %cache.service(),
                cached = cache.get().is_some(),
                "no self-managed token to cancel on close"
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use webfs_config::AuthMethod;
    use webfs_core::{Error, Token, TokenIdentifier};
    use webfs_security::IdentityContext;

    #[derive(Default)]
    struct Authority {
        cancels: AtomicUsize,
        fail_cancel: bool,
    }

    impl TokenAuthority for Authority {
        fn fetch(&self, _renewer: Option<&str>) -> webfs_core::Result<Token> {
            Token::from_identifier(&TokenIdentifier::new("u"), vec![], "k", "nn:1")
        }

        fn renew(&self, _token: &Token) -> webfs_core::Result<i64> {
            Ok(0)
        }

        fn cancel(&self, _token: &Token) -> webfs_core::Result<()> {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            if self.fail_cancel {
                return Err(Error::transport("nn:1", "connection refused"));
            }
            Ok(())
        }
    }

    fn setup(fail_cancel: bool) -> (TokenCache, Arc<Authority>) {
        let authority = Arc::new(Authority {
            fail_cancel,
            ..Default::default()
        });
        let identity = Arc::new(IdentityContext::new("u", AuthMethod::Kerberos));
        (
            TokenCache::new("nn:1", identity, authority.clone(), true),
            authority,
        )
    }

    #[test]
    fn test_cancels_self_managed_token() {
        let (cache, authority) = setup(false);
        cache.acquire().unwrap();

        assert!(relinquish(&cache, authority.as_ref()).unwrap());
        assert_eq!(authority.cancels.load(Ordering::SeqCst), 1);
        assert!(cache.get().is_none());

        assert!(!relinquish(&cache, authority.as_ref()).unwrap());
        assert_eq!(authority.cancels.load(Ordering::SeqCst), 1);
        assert!(matches!(cache.acquire(), Err(Error::Closed)));
    }

    #[test]
    fn test_leaves_foreign_token_alone() {
        let (cache, authority) = setup(false);
        let injected = Arc::new(Token::new(vec![1], vec![], "k", "nn:1"));
        cache.set(injected.clone(), false);

        assert!(!relinquish(&cache, authority.as_ref()).unwrap());
        assert_eq!(authority.cancels.load(Ordering::SeqCst), 0);
        assert!(Arc::ptr_eq(&cache.get().unwrap(), &injected));
    }

    #[test]
    fn test_failed_cancel_propagates_and_empties_cell() {
        let (cache, authority) = setup(true);
        cache.acquire().unwrap();

        assert!(relinquish(&cache, authority.as_ref()).unwrap_err().is_transport());
        assert!(cache.get().is_none());
    }
}
