use clap::Subcommand;
use serde_json::json;
use url::Url;

use crate::cli::config::{load_server_config, ping_server, save_server_config, ServerInfo};
use crate::cli::utils::{
    output_current_item, output_empty_collection, output_no_current_item, output_success, output_value,
    resolve_target_item,
};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Register remote admin API")]
    Add {
        #[arg(help = "Base URL, e.g. https://api.example.org/api")]
        url: String,
        #[arg(help = "Server name (defaults to the URL host)")]
        name: Option<String>,
        #[arg(long, default_value = "", help = "Free-form description")]
        description: String,
    },

    #[command(about = "List all servers with last known status")]
    List,

    #[command(about = "Show currently selected server")]
    Current,

    #[command(about = "Switch to server (persistent selection)")]
    Use {
        #[arg(help = "Server name to switch to")]
        name: String,
    },

    #[command(about = "Remove server from registry")]
    Delete {
        #[arg(help = "Server name to delete")]
        name: String,
    },

    #[command(about = "Check that a server answers (defaults to current server)")]
    Ping {
        #[arg(help = "Server name to ping")]
        name: Option<String>,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = load_server_config()?;

    match cmd {
        ServerCommands::Add { url, name, description } => {
            let parsed = Url::parse(&url)?;
            let name = match name {
                Some(name) => name,
                None => parsed
                    .host_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("Cannot derive a name from '{}'", url))?,
            };

            if config.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' already exists", name));
            }

            let info = ServerInfo::new(parsed.as_str(), description);
            let details = json!({ "name": name, "url": info.url });
            config.servers.insert(name.clone(), info);
            if config.current_server.is_none() {
                config.current_server = Some(name.clone());
            }
            save_server_config(&config)?;

            output_success(&output_format, &format!("Server '{}' added", name), Some(details))
        }
        ServerCommands::List => {
            if config.servers.is_empty() {
                return output_empty_collection(&output_format, "servers", "No servers registered");
            }

            let mut names: Vec<&String> = config.servers.keys().collect();
            names.sort();

            let servers: Vec<_> = names
                .iter()
                .filter_map(|name| config.servers.get(*name).map(|info| (*name, info)))
                .map(|(name, info)| {
                    json!({
                        "name": name,
                        "url": info.url,
                        "status": info.status,
                        "last_ping": info.last_ping,
                        "current": config.current_server.as_deref() == Some(name.as_str()),
                    })
                })
                .collect();

            output_value(&output_format, &json!({ "servers": servers }), || {
                servers
                    .iter()
                    .map(|s| {
                        let marker = if s["current"] == true { "*" } else { " " };
                        format!(
                            "{} {:<16} {:<8} {}",
                            marker,
                            s["name"].as_str().unwrap_or_default(),
                            s["status"].as_str().unwrap_or_default(),
                            s["url"].as_str().unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        ServerCommands::Current => match config.current() {
            Some((name, info)) => output_current_item(&output_format, "server", name, serde_json::to_value(info)?),
            None => output_no_current_item(&output_format, "server"),
        },
        ServerCommands::Use { name } => {
            if !config.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }

            config.current_server = Some(name.clone());
            save_server_config(&config)?;

            output_success(
                &output_format,
                &format!("Switched to server '{}'", name),
                Some(json!({ "current_server": name })),
            )
        }
        ServerCommands::Delete { name } => {
            if config.servers.remove(&name).is_none() {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }
            if config.current_server.as_deref() == Some(name.as_str()) {
                config.current_server = None;
            }
            save_server_config(&config)?;

            output_success(&output_format, &format!("Server '{}' deleted successfully", name), None)
        }
        ServerCommands::Ping { name } => {
            let current = config.current_server.clone();
            let name = resolve_target_item(name, || Ok(current.clone()), "server")?;

            let info = config
                .servers
                .get_mut(&name)
                .ok_or_else(|| anyhow::anyhow!("Server '{}' not found", name))?;
            let status = ping_server(info).await;
            info.update_ping(status);
            let details = json!({ "name": name, "url": info.url, "status": status });
            save_server_config(&config)?;

            output_success(&output_format, &format!("Server '{}' is {}", name, status.as_str()), Some(details))
        }
    }
}
