use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_value};
use crate::cli::{AdminContext, OutputFormat};
use crate::menu::{fallback_menu, MenuItem, MenuItemKind, MenuSection, MenuView};

#[derive(Subcommand)]
pub enum MenuCommands {
    #[command(about = "Show the sidebar built from the backend module list")]
    Show,

    #[command(about = "Show the static default menu filtered for the current user")]
    Fallback,
}

pub async fn handle(cmd: MenuCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AdminContext::build(&output_format)?;
    ctx.session.initialize().await;

    let sections = match cmd {
        MenuCommands::Show => match ctx.menu_service().view(&ctx.session.snapshot()).await {
            MenuView::Ready(sections) => sections,
            MenuView::Loading => Vec::new(),
        },
        MenuCommands::Fallback => fallback_menu(ctx.session.current_user().as_deref()),
    };

    if sections.is_empty() {
        return output_empty_collection(&output_format, "sections", "Not logged in; no menu to show");
    }

    output_value(&output_format, &json!({ "sections": sections }), || render_sections(&sections))
}

fn render_sections(sections: &[MenuSection]) -> String {
    let mut lines = Vec::new();
    for section in sections {
        lines.push(section.title.clone());
        for item in &section.items {
            render_item(item, 1, &mut lines);
        }
    }
    lines.join("\n")
}

fn render_item(item: &MenuItem, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match item.kind {
        MenuItemKind::Link => lines.push(format!(
            "{}{} [{}] {}",
            indent,
            item.title,
            item.icon,
            item.path.as_deref().unwrap_or_default()
        )),
        MenuItemKind::Sub => lines.push(format!("{}{} [{}]", indent, item.title, item.icon)),
    }
    for child in &item.children {
        render_item(child, depth + 1, lines);
    }
}
