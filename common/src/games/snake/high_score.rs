use serde::{Deserialize, Serialize};

use crate::config::{
    ConfigContentProvider, ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
};

/// Persistence collaborator for the best score.
pub trait HighScoreStore: Send {
    fn load_high_score(&self) -> Result<u32, String>;
    fn store_high_score(&mut self, high_score: u32) -> Result<(), String>;
}

/// Keeps the record for the life of the process only.
#[derive(Debug, Default)]
pub struct InMemoryHighScoreStore {
    high_score: u32,
}

impl HighScoreStore for InMemoryHighScoreStore {
    fn load_high_score(&self) -> Result<u32, String> {
        Ok(self.high_score)
    }

    fn store_high_score(&mut self, high_score: u32) -> Result<(), String> {
        self.high_score = high_score;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
}

impl Validate for HighScoreRecord {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Keeps the record in a YAML document.
pub struct YamlHighScoreStore<TProvider = FileContentConfigProvider>
where
    TProvider: ConfigContentProvider,
{
    manager: ConfigManager<TProvider, HighScoreRecord, YamlConfigSerializer>,
}

impl YamlHighScoreStore<FileContentConfigProvider> {
    pub fn from_file(file_path: &str) -> Self {
        Self {
            manager: ConfigManager::from_yaml_file(file_path),
        }
    }
}

impl<TProvider> YamlHighScoreStore<TProvider>
where
    TProvider: ConfigContentProvider,
{
    pub fn with_provider(provider: TProvider) -> Self {
        Self {
            manager: ConfigManager::new(provider, YamlConfigSerializer::new()),
        }
    }
}

impl<TProvider> HighScoreStore for YamlHighScoreStore<TProvider>
where
    TProvider: ConfigContentProvider + Send,
{
    fn load_high_score(&self) -> Result<u32, String> {
        Ok(self.manager.get_config()?.high_score)
    }

    fn store_high_score(&mut self, high_score: u32) -> Result<(), String> {
        self.manager.set_config(&HighScoreRecord { high_score })
    }
}
