// File: src/config.rs
// Purpose: Configuration parsing from dynform.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub form: FormSettings,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Default classes applied before a caller's style hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub form: String,
    pub input_fields: String,
    /// Container of a labelled field
    pub field: String,
    /// Container of a control with its label inline (boolean, each option)
    pub inline: String,
    pub label: String,
    pub control: String,
    pub select: String,
    /// Checkbox and radio controls
    pub choice: String,
    /// Added to a control whose field has an error
    pub control_error: String,
    pub error: String,
    pub button: String,
}

/// Behaviour shared by every form built with this configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default = "default_submit_label")]
    pub submit_label: String,

    #[serde(default = "default_textarea_rows")]
    pub textarea_rows: u32,

    /// Refuse to mount a field list that repeats a key. When off, the last
    /// registration of a key wins.
    #[serde(default = "default_true")]
    pub reject_duplicate_keys: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

// Default values
fn default_submit_label() -> String {
    "Submit".to_string()
}

fn default_textarea_rows() -> u32 {
    2
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_true() -> bool {
    true
}

const CONTROL: &str =
    "border-2 border-gray-200 focus:border-gray-400 outline-none transition-all duration-100 rounded-md";

impl Default for Theme {
    fn default() -> Self {
        Self {
            form: "w-full".to_string(),
            input_fields: "flex flex-col gap-2 py-4".to_string(),
            field: "flex flex-col".to_string(),
            inline: "flex flex-row items-center gap-2".to_string(),
            label: String::new(),
            control: format!("px-3 py-2 {}", CONTROL),
            select: format!("px-1 py-2 {}", CONTROL),
            choice: "w-5 h-5".to_string(),
            control_error: "border-red-700 focus:border-red-700".to_string(),
            error: "text-red-700 font-medium".to_string(),
            button: "w-min px-4 py-2 rounded-md border-2 border-gray-200 hover:border-gray-400 transition-all duration-100"
                .to_string(),
        }
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_label: default_submit_label(),
            textarea_rows: default_textarea_rows(),
            reject_duplicate_keys: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./dynform.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("dynform.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.form.submit_label, "Submit");
        assert_eq!(config.form.textarea_rows, 2);
        assert!(config.form.reject_duplicate_keys);
        assert_eq!(config.theme.error, "text-red-700 font-medium");
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.form.textarea_rows, 2);
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn test_partial_theme_keeps_other_defaults() {
        let toml = r#"
            [theme]
            error = "error-text"

            [form]
            submit_label = "Send"
            reject_duplicate_keys = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.theme.error, "error-text");
        assert_eq!(config.theme.form, "w-full");
        assert_eq!(config.form.submit_label, "Send");
        assert_eq!(config.form.textarea_rows, 2);
        assert!(!config.form.reject_duplicate_keys);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("does/not/exist/dynform.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
