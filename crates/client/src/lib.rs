//! WebHDFS client with delegation-token lifecycle management.
//!
//! ## Architecture
//!
//! - [`transport`] - The blocking HTTP primitive and error-response mapping
//! - [`authority`] - Token issuance, renewal and cancellation over HTTP
//! - [`retry`] - Attaches tokens to authorized calls and replaces a rejected
//!   self-managed token at most once per call
//! - [`shutdown`] - Cancels the client's own token on close
//! - [`client`] - The filesystem operations
//! - [`types`] - JSON shapes returned by the name node
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webfs_client::WebFsClient;
//! use webfs_config::{AuthMethod, ClientConfig};
//! use webfs_security::IdentityContext;
//!
//! # fn example() -> webfs_core::Result<()> {
//! let config = ClientConfig::builder()
//!     .uri("webhdfs://namenode:50070")
//!     .user("alice")
//!     .auth_method(AuthMethod::Kerberos)
//!     .build()?;
//! let identity = Arc::new(IdentityContext::new("alice", AuthMethod::Kerberos));
//! let client = WebFsClient::connect(config, identity)?;
//! let status = client.get_file_status("/tmp")?;
//! println!("{}", status.owner);
//! client.close()?;
//! # Ok(())
//! # }
//! ```

pub mod authority;
pub mod client;
pub mod retry;
pub mod shutdown;
pub mod transport;
pub mod types;

pub use authority::HttpTokenAuthority;
pub use client::{TokenStats, WebFsClient};
pub use retry::RetryController;
pub use transport::{HttpTransport, Request, Response, Transport};
pub use types::{ContentSummary, FileStatus, FileType};
