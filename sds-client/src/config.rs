//! Client configuration types
//!
//! This module defines what the client needs to reach a store: the resource
//! URL, API version, tenant, and the client-credentials pair used to obtain
//! a bearer token. Namespace/stream selection belongs to the caller.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::SdsClient`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the service, e.g. `https://uswe.datahub.connect.aveva.com`
    pub resource: String,

    /// REST API version segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Tenant the client authenticates against
    pub tenant_id: String,

    /// Client-credentials id
    #[serde(default)]
    pub client_id: String,

    /// Client-credentials secret
    #[serde(default)]
    pub client_secret: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    /// Create a configuration with default API version and timeout
    pub fn new(resource: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            api_version: default_api_version(),
            tenant_id: tenant_id.into(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Builder method: set the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Builder method: set the client credentials
    pub fn with_credentials(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    /// Builder method: set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Resource URL without trailing slashes
    pub fn resource_url(&self) -> &str {
        self.resource.trim_end_matches('/')
    }

    /// Base URL of tenant-scoped endpoints
    pub fn base_url(&self) -> String {
        self.tenant_url(&self.tenant_id)
    }

    /// Base URL of endpoints scoped to an arbitrary tenant (community reads)
    pub fn tenant_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/api/{}/Tenants/{}",
            self.resource_url(),
            self.api_version,
            tenant_id
        )
    }

    /// OpenID discovery document of the identity service
    pub fn discovery_url(&self) -> String {
        format!("{}/identity/.well-known/openid-configuration", self.resource_url())
    }

    /// Check that every field required to connect is present
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("resource", &self.resource),
            ("api_version", &self.api_version),
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(crate::SdsError::Config(format!("{} is empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("https://example.com/", "tenant")
            .with_api_version("v2")
            .with_credentials("id", "secret")
            .with_timeout_secs(5);

        assert_eq!(config.api_version, "v2");
        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_urls() {
        let config = ClientConfig::new("https://example.com//", "t1");

        assert_eq!(config.base_url(), "https://example.com/api/v1/Tenants/t1");
        assert_eq!(config.tenant_url("t2"), "https://example.com/api/v1/Tenants/t2");
        assert_eq!(
            config.discovery_url(),
            "https://example.com/identity/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let config = ClientConfig::new("https://example.com", "t1");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"resource":"https://example.com","tenant_id":"t"}"#,
        )
        .unwrap();

        assert_eq!(config.api_version, "v1");
        assert_eq!(config.timeout_secs, 30);
    }
}
