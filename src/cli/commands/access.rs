use clap::Subcommand;
use serde_json::json;

use crate::auth::explain_access;
use crate::cli::utils::output_value;
use crate::cli::{AdminContext, OutputFormat};
use crate::guard::{GuardRequirement, GuardState, RouteGuard};
use crate::types::Action;

#[derive(Subcommand)]
pub enum AccessCommands {
    #[command(about = "Open a module page through the route guard")]
    Check {
        #[arg(help = "Module key, e.g. campaigns")]
        module_key: String,
        #[arg(long, default_value = "read", help = "read, create, update or delete")]
        action: Action,
        #[arg(long, help = "Where a denied user is sent (defaults to ADMIN_DEFAULT_REDIRECT or /dashboard)")]
        redirect_to: Option<String>,
    },
}

pub async fn handle(cmd: AccessCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AccessCommands::Check {
            module_key,
            action,
            redirect_to,
        } => check(module_key, action, redirect_to, output_format).await,
    }
}

async fn check(module_key: String, action: Action, redirect_to: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AdminContext::build(&output_format)?;
    ctx.session.initialize().await;

    let mut requirement = GuardRequirement::new(module_key).action(action);
    if let Some(path) = redirect_to {
        requirement = requirement.redirect_to(path);
    }
    let mut guard = RouteGuard::new(requirement, ctx.guard_settings());
    let runner = ctx.guard_runner();

    let session = ctx.session.snapshot();
    for pending in runner.apply(guard.observe(&session)) {
        pending.await?;
    }

    let requirement = guard.requirement();
    let user = session.user().map(|u| u.as_ref());
    let reason = explain_access(user, &requirement.module_key, requirement.action)
        .err()
        .map(|e| e.to_string());

    let value = json!({
        "module_key": requirement.module_key,
        "action": requirement.action,
        "state": guard.state(),
        "reason": reason,
        "notices": ctx.notifier.notices(),
        "navigations": ctx.navigator.history(),
    });

    output_value(&output_format, &value, || match guard.state() {
        GuardState::Allowed => format!("Allowed: {} {}", requirement.action, requirement.module_key),
        GuardState::Denied => format!("Denied: {}", reason.as_deref().unwrap_or("access denied")),
        GuardState::Checking => "Still checking session".to_string(),
    })
}
