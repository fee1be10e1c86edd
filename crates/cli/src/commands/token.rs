use chrono::{DateTime, Utc};
use webfs_client::WebFsClient;
use webfs_core::{Error, Result, Token};

pub fn fetch(client: &WebFsClient, renewer: Option<&str>) -> Result<()> {
    let token = client.get_delegation_token(renewer)?;
    tracing::info!(kind = %token.kind(), service = %token.service(), "token fetched");
    println!("{}", token.encode_url_string()?);
    Ok(())
}

pub fn renew(client: &WebFsClient, encoded: &str) -> Result<()> {
    let token = Token::decode_url_string(encoded)?;
    let expires = client.renew_delegation_token(&token)?;
    println!("{}", format_expiry(expires)?);
    Ok(())
}

pub fn cancel(client: &WebFsClient, encoded: &str) -> Result<()> {
    let token = Token::decode_url_string(encoded)?;
    client.cancel_delegation_token(&token)?;
    println!("cancelled {token}");
    Ok(())
}

/// Render a millisecond timestamp as RFC 3339
pub fn format_expiry(millis: i64) -> Result<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .ok_or_else(|| Error::token_encoding(format!("expiry {millis} is out of range")))
}
