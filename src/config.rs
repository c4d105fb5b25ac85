//! Configuration management for brickwright
//!
//! Stores settings in ~/.config/brickwright/config.json. The generator API
//! key can always be supplied through the environment instead; the
//! environment wins when both are present.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// OpenRouter API key for generator calls.
    pub openrouter_api_key: Option<String>,
    /// Endpoint the feedback submission POSTs to.
    pub feedback_url: Option<String>,
    /// Service key sent with feedback submissions.
    pub feedback_api_key: Option<String>,
    /// Override for the refinement cycle cap.
    pub max_refinement_cycles: Option<u32>,
}

impl Config {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("brickwright"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return default. A corrupt file is backed
    /// up and replaced with defaults rather than aborting the run.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::from_file(&path),
            None => Self::default(),
        }
    }

    fn from_file(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(err) => {
                    preserve_corrupt_config(path, &content);
                    eprintln!(
                        "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                        err
                    );
                }
            }
        }
        Self::default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join("config.json"), content)?;
        Ok(())
    }

    /// The generator API key: environment variable first, then config file.
    pub fn api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            return Some(key);
        }
        self.openrouter_api_key.clone()
    }

    /// Config file location for display in messages.
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/brickwright/config.json".to_string())
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}
