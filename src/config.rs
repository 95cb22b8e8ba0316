//! Application configuration module
//!
//! Centralizes settings using `confy` for serialization and OS-specific
//! config directory management. The server secret is intentionally not
//! persisted; it arrives through the environment at startup.

use crate::constant::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, MAX_RECENT_WORKSPACES, SECRET_ENV_VAR};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, &self.settings)?;
        info!("Save config to {:?}", Self::config_path()?);
        Ok(())
    }

    /// Get the application data directory
    /// Falls back to a local "data" directory if platform dirs are unavailable
    pub fn data_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("data")
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// Server secret, if the desktop shell provided one.
    pub fn server_secret() -> Option<String> {
        std::env::var(SECRET_ENV_VAR).ok().filter(|s| !s.is_empty())
    }

    /// Remember a workspace path the user recently attached.
    pub fn add_recent_workspace(&mut self, path: String) {
        self.settings.recent_workspaces.retain(|p| p != &path);
        self.settings.recent_workspaces.insert(0, path);
        self.settings
            .recent_workspaces
            .truncate(MAX_RECENT_WORKSPACES);

        // Save changes in background since it's synchronous IO
        let settings = self.settings.clone();
        std::thread::spawn(move || {
            if let Err(e) = confy::store(APP_NAME, None, &settings) {
                tracing::error!("Failed to save recent workspaces: {}", e);
            }
        });
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|_| Self {
            settings: Settings::default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the session server
    #[serde(default)]
    pub server_url: String,

    /// Project scope for all API calls
    #[serde(default)]
    pub project: String,

    /// Whether the file tree lists dotfiles
    #[serde(default)]
    pub show_hidden_files: bool,

    /// Application theme (for future use)
    #[serde(default)]
    pub theme: String,

    /// Recently attached workspace paths
    #[serde(default)]
    pub recent_workspaces: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3001".to_string(),
            project: "default".to_string(),
            show_hidden_files: false,
            theme: "light".to_string(),
            recent_workspaces: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let settings = Settings::default();
        assert_eq!(settings.server_url, "http://127.0.0.1:3001");
        assert_eq!(settings.project, "default");
        assert!(!settings.show_hidden_files);
    }

    #[test]
    fn recent_workspaces_are_deduped_and_bounded() {
        let mut config = Config {
            settings: Settings::default(),
        };
        for i in 0..(MAX_RECENT_WORKSPACES + 3) {
            config.add_recent_workspace(format!("/repo/{i}"));
        }
        config.add_recent_workspace("/repo/3".to_string());

        let recents = &config.settings.recent_workspaces;
        assert_eq!(recents.len(), MAX_RECENT_WORKSPACES);
        assert_eq!(recents[0], "/repo/3");
        assert_eq!(recents.iter().filter(|p| *p == "/repo/3").count(), 1);
    }
}
