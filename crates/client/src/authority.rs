//! Token authority over the WebHDFS REST interface.
//!
//! Token-management requests never carry a delegation token themselves; they
//! authenticate with `user.name` (or whatever the transport's handshake
//! provides).

use std::sync::Arc;

use webfs_config::ClientConfig;
use webfs_core::{
    Op, Result, Token, PARAM_RENEWER, PARAM_TOKEN, PARAM_TOKEN_KIND, PARAM_TOKEN_SERVICE,
};
use webfs_security::TokenAuthority;

use crate::transport::{Request, Transport};
use crate::types::{LongEnvelope, TokenEnvelope};

pub struct HttpTokenAuthority {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl HttpTokenAuthority {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    fn token_request(&self, op: Op, token: &Token) -> Result<Request> {
        Ok(Request::new(op, "/").param(PARAM_TOKEN, token.encode_url_string()?))
    }

    /// Fill in whatever the issued token left empty
    fn apply_defaults(&self, token: Token) -> Token {
        let token = if token.kind().is_empty() {
            token.with_kind(self.config.default_token_kind())
        } else {
            token
        };
        if token.service().is_empty() {
            token.with_service(self.config.token_service())
        } else {
            token
        }
    }
}

impl TokenAuthority for HttpTokenAuthority {
    fn fetch(&self, renewer: Option<&str>) -> Result<Token> {
        let mut request = Request::new(Op::GetDelegationToken, "/");
        if let Some(renewer) = renewer {
            request = request.param(PARAM_RENEWER, renewer);
        }
        if let Some(kind) = &self.config.token_kind_override {
            request = request.param(PARAM_TOKEN_KIND, kind);
        }
        if let Some(service) = &self.config.token_service_override {
            request = request.param(PARAM_TOKEN_SERVICE, service);
        }

        let envelope: TokenEnvelope = self.transport.send(&request)?.json()?;
        let token = self.apply_defaults(Token::decode_url_string(&envelope.token.url_string)?);
        tracing::debug!(kind = %token.kind(), service = %token.service(), "token issued");
        Ok(token)
    }

    fn renew(&self, token: &Token) -> Result<i64> {
        let request = self.token_request(Op::RenewDelegationToken, token)?;
        let envelope: LongEnvelope = self.transport.send(&request)?.json()?;
        tracing::debug!(service = %token.service(), expires = envelope.long, "token renewed");
        Ok(envelope.long)
    }

    fn cancel(&self, token: &Token) -> Result<()> {
        let request = self.token_request(Op::CancelDelegationToken, token)?;
        self.transport.send(&request)?;
        tracing::debug!(service = %token.service(), "token cancelled");
        Ok(())
    }
}
