use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_DIR_ENV: &str = "CALLSCOPE_CONFIG_DIR";
const API_BASE_URL_ENV: &str = "CALLSCOPE_API_BASE_URL";
const TOKEN_ENV: &str = "CALLSCOPE_TOKEN";
const CONFIG_DIR_NAME: &str = "callscope";
const CONFIG_FILE_NAME: &str = "callscope.config";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_show_transcription")]
    pub show_transcription: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
            show_transcription: default_show_transcription(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env::var(API_BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = env::var(TOKEN_ENV).ok().filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }
        self
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_show_transcription() -> bool {
    true
}

pub fn load() -> Result<AppConfig> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<AppConfig> {
    match fs::read_to_string(path) {
        Ok(text) => parse(&text)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read config at {}", path.display()))
        }
    }
}

/// Config files are JSON; comments and trailing commas are tolerated.
pub fn parse(text: &str) -> Result<AppConfig> {
    Ok(json5::from_str(text)?)
}

pub fn save(cfg: &AppConfig) -> Result<()> {
    save_to(cfg, &config_path())
}

pub fn save_to(cfg: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create config directory {}", parent.display()))?;
    }
    let data = serde_json::to_vec_pretty(cfg)?;
    fs::write(path, data)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

pub fn config_dir() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_DIR_ENV) {
        PathBuf::from(path)
    } else if let Some(path) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(path).join(CONFIG_DIR_NAME)
    } else if let Some(home) = env::var_os("HOME") {
        Path::new(&home).join(".config").join(CONFIG_DIR_NAME)
    } else if let Some(appdata) = env::var_os("APPDATA") {
        PathBuf::from(appdata).join(CONFIG_DIR_NAME)
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = parse(r#"{ "token": "abc" }"#).expect("parse");
        assert_eq!(cfg.api_base_url, "http://localhost:8000");
        assert_eq!(cfg.token.as_deref(), Some("abc"));
        assert_eq!(cfg.request_timeout_secs, 30);
        assert!(cfg.show_transcription);
    }

    #[test]
    fn comments_and_trailing_commas_are_accepted() {
        let cfg = parse(
            r#"{
                // staging backend
                "api_base_url": "https://staging.example.com",
                "request_timeout_secs": 0,
            }"#,
        )
        .expect("parse");
        assert_eq!(cfg.api_base_url, "https://staging.example.com");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = env::temp_dir().join(format!("callscope-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);
        let cfg = AppConfig {
            api_base_url: "https://api.example.com".into(),
            token: Some("t".into()),
            request_timeout_secs: 12,
            show_transcription: false,
        };
        save_to(&cfg, &path).expect("save");
        assert_eq!(load_from(&path).expect("load"), cfg);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn absent_file_yields_defaults() {
        let path = env::temp_dir().join("callscope-definitely-missing").join("none.config");
        assert_eq!(load_from(&path).expect("defaults"), AppConfig::default());
    }
}
