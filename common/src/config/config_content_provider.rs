use std::io::ErrorKind;
use std::sync::Mutex;

/// Raw text storage behind a [`super::ConfigManager`].
///
/// `Ok(None)` from [`ConfigContentProvider::get_config_content`] means nothing
/// has been stored yet and the caller should fall back to defaults.
pub trait ConfigContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String>;
    fn set_config_content(&self, content: &str) -> Result<(), String>;
}

pub struct FileContentConfigProvider {
    file_path: String,
}

impl FileContentConfigProvider {
    pub fn new(file_path: String) -> Self {
        Self { file_path }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Failed to read config file {}: {}", self.file_path, err)),
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        std::fs::write(self.file_path.as_str(), content)
            .map_err(|e| format!("Failed to write config file {}: {}", self.file_path, e))
    }
}

/// Keeps content in process memory; nothing survives a restart.
#[derive(Default)]
pub struct MemoryContentConfigProvider {
    content: Mutex<Option<String>>,
}

impl MemoryContentConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigContentProvider for MemoryContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        let content = self.content.lock().map_err(|e| format!("Config content lock poisoned: {}", e))?;
        Ok(content.clone())
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        let mut current = self.content.lock().map_err(|e| format!("Config content lock poisoned: {}", e))?;
        *current = Some(content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_none() {
        let provider = FileContentConfigProvider::new("snake_arcade_missing_file.yaml".to_string());
        assert_eq!(provider.get_config_content(), Ok(None));
    }

    #[test]
    fn test_memory_provider_starts_empty_then_keeps_content() {
        let provider = MemoryContentConfigProvider::new();
        assert_eq!(provider.get_config_content(), Ok(None));

        provider.set_config_content("high_score: 3").unwrap();
        assert_eq!(provider.get_config_content(), Ok(Some("high_score: 3".to_string())));
    }
}
