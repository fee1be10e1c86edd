//! Token ownership and identity for webfs
//!
//! This crate provides:
//! - The caller's `IdentityContext` and its ambient tokens
//! - The `TokenAuthority` seam through which tokens are issued, renewed and cancelled
//! - The per-client `TokenCache` that decides when to fetch, adopt or replace a token

pub mod authority;
pub mod cache;
pub mod identity;

pub use authority::TokenAuthority;
pub use cache::{CacheStats, TokenCache};
pub use identity::IdentityContext;
