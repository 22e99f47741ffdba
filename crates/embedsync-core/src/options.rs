//! Engine options.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Attribute on a provider wrapper element carrying the resolved embed URL.
pub const DEFAULT_TRACKING_ATTRIBUTE: &str = "data-ephox-embed-iri";

/// Options controlling parsing, building and the dialog session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    /// Filter parsed and patched HTML through the schema whitelist.
    pub filter_html: bool,
    /// Expose width/height in the UI-shaped record.
    pub dimensions: bool,
    /// Width used when a new embed has none.
    pub default_width: String,
    /// Height used when a new embed has none.
    pub default_height: String,
    /// Attribute a provider wrapper uses to track the resolved URL.
    pub tracking_attribute: String,
    /// Replacement whitelist; the built-in media schema is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaConfig>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            filter_html: true,
            dimensions: true,
            default_width: "300".to_string(),
            default_height: "150".to_string(),
            tracking_attribute: DEFAULT_TRACKING_ATTRIBUTE.to_string(),
            schema: None,
        }
    }
}

impl EmbedOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Element name to allowed attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub elements: BTreeMap<String, Vec<String>>,
}
