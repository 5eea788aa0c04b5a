//! Gateway connection configuration.
//!
//! This module handles the connection record the client holds for the
//! lifetime of the process, plus loading it from a `.dem-client.toml`
//! file and merging partial updates into it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for the analytics gateway.
///
/// Access and secret keys may be blank (the mock transport never uses
/// them), but `base_url` and `region` are always present once the
/// configuration exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deployment region, used in the credential scope of the
    /// authorization header.
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key identifier. May be empty.
    #[serde(default)]
    pub access_key: String,

    /// Secret key. May be empty.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://gateway.dem.local".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// A partial configuration update.
///
/// Fields left as `None` keep their current value when the patch is
/// applied, so callers can change a single field without restating the
/// rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub base_url: Option<String>,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl GatewayConfig {
    /// Create a configuration with the given endpoint and region and
    /// blank credentials.
    pub fn new(base_url: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Merge a partial update into this configuration field-by-field.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(ref base_url) = patch.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(ref region) = patch.region {
            self.region = region.clone();
        }
        if let Some(ref access_key) = patch.access_key {
            self.access_key = access_key.clone();
        }
        if let Some(ref secret_key) = patch.secret_key {
            self.secret_key = secret_key.clone();
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: GatewayConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists
    /// but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".dem-client.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(!config.base_url.is_empty());
        assert!(config.access_key.is_empty());
        assert!(config.secret_key.is_empty());
    }

    #[test]
    fn test_apply_partial_patch_preserves_other_fields() {
        let mut config = GatewayConfig::new("A", "B");
        config.apply(&ConfigPatch {
            region: Some("C".to_string()),
            ..ConfigPatch::default()
        });

        assert_eq!(config.base_url, "A");
        assert_eq!(config.region, "C");
        assert!(config.access_key.is_empty());
    }

    #[test]
    fn test_apply_empty_patch_is_identity() {
        let mut config = GatewayConfig::new("https://gw.example.com", "eu-west-1");
        let before = config.clone();
        config.apply(&ConfigPatch::default());
        assert_eq!(config, before);
    }

    #[test]
    fn test_apply_full_patch() {
        let mut config = GatewayConfig::default();
        config.apply(&ConfigPatch {
            base_url: Some("https://gw.example.com".to_string()),
            region: Some("ap-south-1".to_string()),
            access_key: Some("AKIATEST".to_string()),
            secret_key: Some("secret".to_string()),
        });

        assert_eq!(config.base_url, "https://gw.example.com");
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.access_key, "AKIATEST");
        assert_eq!(config.secret_key, "secret");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://gw.example.com"
region = "eu-central-1"
access_key = "AKIATEST"
"#
        )
        .unwrap();

        let config = GatewayConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "https://gw.example.com");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.access_key, "AKIATEST");
        // Unspecified field falls back to its default
        assert!(config.secret_key.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails_with_context() {
        let err = GatewayConfig::load(Path::new("/nonexistent/dem.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
