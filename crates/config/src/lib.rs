//! Client configuration for webfs
//!
//! This crate turns a `webhdfs://` or `swebhdfs://` URI plus authentication
//! settings into an immutable [`ClientConfig`]. Configuration errors surface at
//! build time so a client is never constructed half-configured.

pub mod config;
pub mod loader;


pub use config::{AuthMethod, ClientConfig, Scheme};
pub use loader::ClientConfigBuilder;
