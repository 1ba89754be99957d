use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::{Access, Credentials, CurrentUser};
use crate::cli::utils::{output_error, output_success, output_value};
use crate::cli::{AdminContext, OutputFormat};
use crate::session::{SessionState, TokenStore};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the admin API")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and discard the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information and permissions")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AdminContext::build(&output_format)?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            let credentials = Credentials { email, password };

            match ctx.session.login(&credentials).await {
                Ok(user) => output_success(
                    &output_format,
                    &format!("Logged in as {}", user.label()),
                    Some(json!({ "user": user_json(&user) })),
                ),
                Err(e) => {
                    if let OutputFormat::Json = output_format {
                        output_error(&output_format, &e.to_string(), None)?;
                    }
                    Err(e.into())
                }
            }
        }
        AuthCommands::Logout => {
            ctx.session.logout().await;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let saved_at = ctx.tokens.saved_at()?;
            ctx.session.initialize().await;
            let user = ctx.session.current_user();

            let value = json!({
                "server": ctx.client.base_url(),
                "authenticated": user.is_some(),
                "token_saved_at": saved_at,
                "user": user.as_deref().map(user_json),
            });

            output_value(&output_format, &value, || match (&user, saved_at) {
                (Some(user), _) => format!("Authenticated as {} on {}", user.label(), ctx.client.base_url()),
                (None, Some(_)) => "Stored token was rejected; please log in again".to_string(),
                (None, None) => "Not logged in".to_string(),
            })
        }
        AuthCommands::Whoami => {
            if ctx.tokens.load()?.is_none() {
                return Err(anyhow::anyhow!("Not logged in"));
            }

            ctx.session.initialize().await;
            let user = match ctx.session.snapshot() {
                SessionState::Authenticated(user) => user,
                _ => return Err(anyhow::anyhow!("Session expired; please log in again")),
            };

            output_value(&output_format, &user_json(&user), || describe_user(&user))
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn user_json(user: &CurrentUser) -> Value {
    let permissions: Value = match &user.access {
        Access::SuperAdmin => json!("*"),
        Access::Standard(set) => {
            set.module_keys()
                .into_iter()
                .filter_map(|key| set.get(key).map(|grants| (key, grants)))
                .map(|(key, grants)| {
                    json!({
                        "module_key": key,
                        "read": grants.read,
                        "create": grants.create,
                        "update": grants.update,
                        "delete": grants.delete,
                    })
                })
                .collect()
        }
    };

    json!({
        "id": user.id,
        "email": user.email,
        "display_name": user.display_name,
        "role": user.role.name,
        "super_admin": user.is_super_admin(),
        "permissions": permissions,
    })
}

fn describe_user(user: &CurrentUser) -> String {
    let mut out = format!("{} <{}>\nRole: {}", user.label(), user.email, user.role.name);

    match &user.access {
        Access::SuperAdmin => out.push_str("\nAccess: all modules"),
        Access::Standard(set) if set.is_empty() => out.push_str("\nAccess: none"),
        Access::Standard(set) => {
            for key in set.module_keys() {
                if let Some(grants) = set.get(key) {
                    let flag = |on: bool, c: char| if on { c } else { '-' };
                    out.push_str(&format!(
                        "\n  {}{}{}{} {}",
                        flag(grants.read, 'r'),
                        flag(grants.create, 'c'),
                        flag(grants.update, 'u'),
                        flag(grants.delete, 'd'),
                        key
                    ));
                }
            }
        }
    }

    out
}
