//! The token authority seam.

use webfs_core::{Result, Token};

/// Remote authority that issues, renews and cancels delegation tokens.
///
/// Each call is one blocking round trip. Implementations never retry; a
/// rejected token surfaces as `Error::InvalidToken` and everything else as the
/// matching transport or remote error.
pub trait TokenAuthority: Send + Sync {
    /// Issue a new token for the calling principal, optionally naming a renewer
    fn fetch(&self, renewer: Option<&str>) -> Result<Token>;

    /// Extend `token`, returning its new expiry in milliseconds since the epoch
    fn renew(&self, token: &Token) -> Result<i64>;

    /// Revoke `token`
    fn cancel(&self, token: &Token) -> Result<()>;
}
