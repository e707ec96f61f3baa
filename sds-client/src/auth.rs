//! Client-credentials authentication
//!
//! The identity service publishes its token endpoint in an OpenID discovery
//! document; the client posts its credentials there and receives a bearer
//! token.

use crate::config::ClientConfig;
use crate::types::{Result, SdsError};
use reqwest::blocking::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    token_endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Obtain a bearer token for the configured client credentials
pub fn request_token(http: &Client, config: &ClientConfig) -> Result<String> {
    let discovery_url = config.discovery_url();
    log::debug!("Fetching OpenID discovery document: {}", discovery_url);

    let response = http.get(&discovery_url).send()?;
    if !response.status().is_success() {
        return Err(SdsError::Auth(format!(
            "discovery request returned {}",
            response.status()
        )));
    }
    let discovery: DiscoveryDocument = parse_body(&response.text()?)?;

    log::debug!("Requesting token from {}", discovery.token_endpoint);
    let response = http
        .post(&discovery.token_endpoint)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()?;

    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(SdsError::Auth(format!("token request returned {}: {}", status, body)));
    }

    let token: TokenResponse = parse_body(&body)?;
    if let Some(expires_in) = token.expires_in {
        log::info!("Authenticated, token valid for {}s", expires_in);
    }
    Ok(token.access_token)
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| SdsError::Auth(format!("unexpected response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_document() {
        let doc: DiscoveryDocument = parse_body(
            r#"{"issuer":"https://example.com/identity","token_endpoint":"https://example.com/identity/connect/token"}"#,
        )
        .unwrap();
        assert_eq!(doc.token_endpoint, "https://example.com/identity/connect/token");
    }

    #[test]
    fn test_token_response() {
        let token: TokenResponse =
            parse_body(r#"{"access_token":"abc","expires_in":3600,"token_type":"Bearer"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn test_malformed_response_is_auth_error() {
        let err = parse_body::<TokenResponse>(r#"{"error":"invalid_client"}"#).unwrap_err();
        assert!(matches!(err, SdsError::Auth(_)));
    }
}
