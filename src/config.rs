use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_minutes_amount: u32,
    pub minutes_step: u32,
    pub tick_interval_ms: u64,
    pub task_suggestions: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_minutes_amount: 25,
            minutes_step: 5,
            tick_interval_ms: 1000,
            task_suggestions: vec![
                "Project 1".to_string(),
                "Project 2".to_string(),
                "Project 3".to_string(),
                "Project 4".to_string(),
            ],
            log_level: "info".to_string(),
        }
    }
}

pub fn get_base_dir() -> Result<PathBuf> {
    let mut path =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    path.push(".pomo");
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_base_dir()?.join("config.json"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        let data = serde_json::to_string_pretty(&config)?;
        fs::write(path, data)?;
        return Ok(config);
    }

    let data = fs::read_to_string(path)?;
    let config = serde_json::from_str(&data)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_writes_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");

        let config = load_config_from(&path)?;
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = load_config_from(&path)?;
        assert_eq!(reloaded, config);
        Ok(())
    }

    #[test]
    fn test_load_config_fills_missing_fields() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_minutes_amount": 50 }"#)?;

        let config = load_config_from(&path)?;
        assert_eq!(config.default_minutes_amount, 50);
        assert_eq!(config.minutes_step, 5);
        assert_eq!(config.tick_interval_ms, 1000);
        Ok(())
    }

    #[test]
    fn test_load_config_rejects_garbage() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "not json")?;

        assert!(load_config_from(&path).is_err());
        Ok(())
    }
}
