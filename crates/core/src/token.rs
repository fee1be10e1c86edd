//! Delegation tokens and their wire encoding.
//!
//! A [`Token`] is opaque to the client apart from its `kind` and `service`
//! tags. The identifier bytes decode to a [`TokenIdentifier`], which is how the
//! owning principal is recovered. On the wire a token travels as a URL-safe
//! string (the `urlString` of the authority's JSON envelope).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Error, Result};

/// Decoded token identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentifier {
    /// Principal the token acts on behalf of
    pub owner: String,
    /// Principal allowed to renew the token, empty when unrestricted
    pub renewer: String,
    /// Principal that requested the token when it differs from the owner
    pub real_user: String,
    /// Issue time in milliseconds since the epoch
    pub issue_date: i64,
    /// Hard expiry in milliseconds since the epoch
    pub max_date: i64,
    pub sequence_number: u64,
    pub master_key_id: u32,
}

impl TokenIdentifier {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            renewer: String::new(),
            real_user: String::new(),
            issue_date: 0,
            max_date: 0,
            sequence_number: 0,
            master_key_id: 0,
        }
    }

    pub fn with_renewer(mut self, renewer: impl Into<String>) -> Self {
        self.renewer = renewer.into();
        self
    }

    pub fn with_sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn with_dates(mut self, issue_date: i64, max_date: i64) -> Self {
        self.issue_date = issue_date;
        self.max_date = max_date;
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Hard expiry as a timestamp, if set
    pub fn max_date_utc(&self) -> Option<DateTime<Utc>> {
        if self.max_date <= 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.max_date).single()
    }
}

/// An opaque delegation token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    identifier: Vec<u8>,
    password: Vec<u8>,
    kind: String,
    service: String,
}

impl Token {
    pub fn new(
        identifier: Vec<u8>,
        password: Vec<u8>,
        kind: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            password,
            kind: kind.into(),
            service: service.into(),
        }
    }

    /// Build a token around an encoded identifier
    pub fn from_identifier(
        identifier: &TokenIdentifier,
        password: Vec<u8>,
        kind: impl Into<String>,
        service: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(identifier.to_bytes()?, password, kind, service))
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    pub fn password(&self) -> &[u8] {
        &self.password
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn decode_identifier(&self) -> Result<TokenIdentifier> {
        TokenIdentifier::from_bytes(&self.identifier)
    }

    /// Principal encoded in the identifier
    pub fn owner(&self) -> Result<String> {
        Ok(self.decode_identifier()?.owner)
    }

    /// Encode as the URL-safe string used in query parameters and JSON envelopes
    pub fn encode_url_string(&self) -> Result<String> {
        let bytes = bincode::serialize(self)?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn decode_url_string(encoded: &str) -> Result<Self> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(Error::token_encoding("empty token string"));
        }
        let bytes = URL_SAFE_NO_PAD.decode(trimmed)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

// The password never reaches logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("service", &self.service)
            .field("identifier_len", &self.identifier.len())
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode_identifier() {
            Ok(id) => write!(
                f,
                "Kind: {}, Service: {}, Owner: {}, Sequence: {}",
                self.kind, self.service, id.owner, id.sequence_number
            ),
            Err(_) => write!(f, "Kind: {}, Service: {}", self.kind, self.service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token() -> Token {
        let id = TokenIdentifier::new("DummyUser")
            .with_renewer("yarn")
            .with_sequence_number(7)
            .with_dates(1_700_000_000_000, 1_700_604_800_000);
        Token::from_identifier(&id, vec![1, 2, 3, 4], "WEBHDFS delegation", "10.0.0.1:50070")
            .unwrap()
    }

    #[test]
    fn test_owner_decodes_from_identifier() {
        let token = sample_token();
        assert_eq!(token.owner().unwrap(), "DummyUser");
        assert_eq!(token.decode_identifier().unwrap().renewer, "yarn");
    }

    #[test]
    fn test_url_string_round_trip_keeps_tags() {
        let token = sample_token();
        let encoded = token.encode_url_string().unwrap();
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));

        let decoded = Token::decode_url_string(&encoded).unwrap();
        assert_eq!(decoded, token);
        assert_eq!(decoded.kind(), "WEBHDFS delegation");
        assert_eq!(decoded.service(), "10.0.0.1:50070");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Token::decode_url_string(""),
            Err(Error::TokenEncoding { .. })
        ));
        assert!(matches!(
            Token::decode_url_string("not*base64"),
            Err(Error::TokenEncoding { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", sample_token());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("[1, 2, 3, 4]"));
    }

    #[test]
    fn test_with_kind_and_service_override() {
        let token = sample_token().with_kind("bar").with_service("foo");
        assert_eq!(token.kind(), "bar");
        assert_eq!(token.service(), "foo");
        assert_eq!(token.owner().unwrap(), "DummyUser");
    }

    #[test]
    fn test_max_date_utc() {
        let id = TokenIdentifier::new("u");
        assert!(id.max_date_utc().is_none());
        let id = id.with_dates(0, 1_000);
        assert_eq!(id.max_date_utc().unwrap().timestamp_millis(), 1_000);
    }
}
