//! The caller's identity context.
//!
//! An `IdentityContext` carries the authenticated principal and any tokens a
//! prior party placed there before the client was built (for example a job
//! framework that distributes tokens to its tasks). Clients only read it; the
//! caller may add tokens.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use webfs_config::AuthMethod;
use webfs_core::Token;

#[derive(Debug)]
pub struct IdentityContext {
    principal: String,
    auth_method: AuthMethod,
    tokens: RwLock<HashMap<String, Arc<Token>>>,
}

impl IdentityContext {
    pub fn new(principal: impl Into<String>, auth_method: AuthMethod) -> Self {
        Self {
            principal: principal.into(),
            auth_method,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    /// Store `token` under its service, replacing any token for that service
    pub fn add_token(&self, token: Arc<Token>) {
        tracing::debug!(
            principal = %self.principal,
            service = %token.service(),
            kind = %token.kind(),
            "ambient token added to identity context"
        );
        self.tokens
            .write()
            .insert(token.service().to_string(), token);
    }

    pub fn remove_token(&self, service: &str) -> Option<Arc<Token>> {
        self.tokens.write().remove(service)
    }

    /// Ambient token for `service`, if any
    pub fn token_for_service(&self, service: &str) -> Option<Arc<Token>> {
        self.tokens.read().get(service).cloned()
    }

    pub fn tokens(&self) -> Vec<Arc<Token>> {
        self.tokens.read().values().cloned().collect()
    }
}
