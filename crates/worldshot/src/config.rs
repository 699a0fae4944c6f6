//! Service configuration
//!
//! Read from `worldshot.toml`. Every key is optional; a missing file yields
//! the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use worldshot_render::RenderSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "worldshot.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<NAME>_.json` world descriptions
    pub world_path: PathBuf,
    /// Item table
    pub items_path: PathBuf,
    /// Sprite atlas root, walked recursively
    pub atlas_path: PathBuf,
    /// Caption and stack count font
    pub font_path: PathBuf,
    /// Output directory for `<NAME>.png`
    pub results_path: PathBuf,
    /// Server name shown in the caption
    pub server_name: String,
    /// Atlas name of the decorative border
    pub border: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world_path: PathBuf::from("worlds"),
            items_path: PathBuf::from("items.json"),
            atlas_path: PathBuf::from("cache"),
            font_path: PathBuf::from("cache/fonts/century_gothic_bold.ttf"),
            results_path: PathBuf::from("results"),
            server_name: "Server".to_string(),
            border: "valentines".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Output path of a rendered world
    pub fn result_path(&self, name: &str) -> PathBuf {
        self.results_path.join(format!("{name}.png"))
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            server_name: self.server_name.clone(),
            border: self.border.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r#"
server_name = "Pixel Isles"
world_path = "/srv/worlds"
"#,
        )
        .unwrap();

        assert_eq!(config.server_name, "Pixel Isles");
        assert_eq!(config.world_path, PathBuf::from("/srv/worlds"));
        assert_eq!(config.border, "valentines");
        assert_eq!(config.results_path, PathBuf::from("results"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&tmp.path().join("worldshot.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("worldshot.toml");
        std::fs::write(&path, "border = \"halloween\"\nresults_path = \"out\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.render_settings().border, "halloween");
        assert_eq!(config.result_path("START"), PathBuf::from("out/START.png"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(matches!(
            Config::from_toml("server_name = 12"),
            Err(ConfigError::Parse(_))
        ));
    }
}
