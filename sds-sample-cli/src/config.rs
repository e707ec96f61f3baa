//! Settings loading (appsettings.json)

use anyhow::{bail, Context, Result};
use sds_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sample settings, read from `appsettings.json` (or an equivalent `.toml`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    pub resource: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    pub tenant_id: String,
    pub namespace_id: String,
    #[serde(default)]
    pub community_id: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub stream_id: String,
    #[serde(default = "default_type_id")]
    pub type_id: String,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_type_id() -> String {
    "PiEvent".to_string()
}

impl AppSettings {
    /// Community to read from, if one is configured
    pub fn community(&self) -> Option<&str> {
        self.community_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Connection settings for the client library
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.resource, &self.tenant_id)
            .with_api_version(&self.api_version)
            .with_credentials(&self.client_id, &self.client_secret)
    }
}

/// Load settings from a JSON or TOML file
pub fn load_settings(path: &Path) -> Result<AppSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;

    let is_toml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let settings: AppSettings = if is_toml {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?
    };

    if settings.stream_id.trim().is_empty() {
        bail!("StreamId is empty in {:?}", path);
    }

    Ok(settings)
}
