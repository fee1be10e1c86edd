//! Core domain types, errors, and constants for the `webfs` client.
//!
//! This crate holds the building blocks shared by every other `webfs` crate.
//!
//! ## Key Components
//!
//! - **`errors`**: The primary `Error` enum and `Result` alias. Every failure a
//!   filesystem call can surface is one of its variants.
//! - **`token`**: The delegation `Token`, its decoded `TokenIdentifier`, and the
//!   URL-safe string encoding used on the wire.
//! - **`op`**: The static operation table that decides which remote calls must
//!   carry a token.
//! - **`constants`**: Wire parameter names, default ports and token kinds.

pub mod constants;
pub mod errors;
pub mod op;
pub mod token;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    op::{requires_auth, HttpMethod, Op, OpDescriptor},
    token::{Token, TokenIdentifier},
};
