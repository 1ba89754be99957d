use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

const SERVER_FILE: &str = "servers.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Base URL of the admin API, without a trailing slash
    pub url: String,
    pub description: String,
    pub added_at: DateTime<Utc>,
    pub last_ping: Option<DateTime<Utc>>,
    pub status: ServerStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub servers: HashMap<String, ServerInfo>,
    pub current_server: Option<String>,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Up => "up",
            ServerStatus::Down => "down",
            ServerStatus::Unknown => "unknown",
        }
    }
}

impl ServerInfo {
    pub fn new(url: &str, description: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            description,
            added_at: Utc::now(),
            last_ping: None,
            status: ServerStatus::Unknown,
        }
    }

    pub fn update_ping(&mut self, status: ServerStatus) {
        self.last_ping = Some(Utc::now());
        self.status = status;
    }
}

impl ServerConfig {
    pub fn current(&self) -> Option<(&str, &ServerInfo)> {
        let name = self.current_server.as_deref()?;
        self.servers.get(name).map(|info| (name, info))
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = crate::config::default_config_dir()?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    load_server_config_from(&get_config_dir()?)
}

pub fn save_server_config(config: &ServerConfig) -> anyhow::Result<()> {
    save_server_config_to(&get_config_dir()?, config)
}

pub fn load_server_config_from(dir: &Path) -> anyhow::Result<ServerConfig> {
    let server_file = dir.join(SERVER_FILE);

    if !server_file.exists() {
        return Ok(ServerConfig::default());
    }

    let content = fs::read_to_string(server_file)?;
    let config: ServerConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_server_config_to(dir: &Path, config: &ServerConfig) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(dir.join(SERVER_FILE), content)?;
    Ok(())
}

/// The selected server's URL wins over the environment-configured one
pub fn resolve_base_url(app: &AppConfig, servers: &ServerConfig) -> String {
    match servers.current() {
        Some((_, info)) => info.url.clone(),
        None => app.api.base_url.clone(),
    }
}

/// Any HTTP answer counts as up; only transport failures mark a server down
pub async fn ping_server(server_info: &ServerInfo) -> ServerStatus {
    let client = reqwest::Client::new();

    match client
        .get(&server_info.url)
        .timeout(Duration::from_secs(5))
        .send()
        .await
    {
        Ok(_) => ServerStatus::Up,
        Err(_) => ServerStatus::Down,
    }
}
