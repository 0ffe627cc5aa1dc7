use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8081";
pub const DEFAULT_PRODUCT_NAME: &str = "Persona Studio";
pub const DEFAULT_TAGLINE: &str = "AI-Powered Voice Conversations";

/// Endpoint override checked before the config file.
pub const ENDPOINT_ENV_VAR: &str = "PERSONA_VOICE_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    /// Base address of the voice-generation service.
    pub endpoint: Option<String>,
    /// Branding shown in the selection screen header.
    pub product_name: Option<String>,
    pub tagline: Option<String>,
    /// Auto-play a fresh voice response as it arrives. Defaults to on.
    pub autoplay: Option<bool>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        Ok(())
    }

    /// Endpoint precedence: environment variable, then config file, then
    /// the built-in default.
    pub fn endpoint(&self) -> String {
        std::env::var(ENDPOINT_ENV_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn product_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(DEFAULT_PRODUCT_NAME)
    }

    pub fn tagline(&self) -> &str {
        self.tagline.as_deref().unwrap_or(DEFAULT_TAGLINE)
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay.unwrap_or(true)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("persona-cli").join("config.json"))
    }
}
