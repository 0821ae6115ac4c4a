use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Session id the backend keys watch positions by.
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            session_id: default_session_id(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, anyhow::Error> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "iptv-viewer", "iptv-viewer") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists() {
                let content = fs::read_to_string(config_path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }
        Ok(AppConfig::default())
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "iptv-viewer", "iptv-viewer") {
            let config_dir = proj_dirs.config_dir();
            fs::create_dir_all(config_dir)?;
            let config_path = config_dir.join("config.json");
            let content = serde_json::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }

    pub fn set_session_id(&mut self, session_id: String) {
        self.session_id = session_id;
        let _ = self.save();
    }
}
