use serde::{Deserialize, Serialize};
use snake_arcade_common::config::{
    ConfigManager, FileContentConfigProvider, GameSettings, Validate, YamlConfigSerializer,
};
use snake_arcade_common::games::snake::Mode;

pub const CONFIG_FILE: &str = "snake_arcade_config.yaml";

pub fn get_config_manager(file_path: &str) -> ConfigManager<FileContentConfigProvider, HostConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HostConfig {
    pub game: GameSettings,
    pub default_mode: Mode,
    pub sound_enabled: bool,
    pub high_score_file: String,
}

impl Validate for HostConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.high_score_file.is_empty() {
            return Err("high_score_file must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            default_mode: Mode::Classic,
            sound_enabled: true,
            high_score_file: "snake_arcade_high_score.yaml".to_string(),
        }
    }
}
