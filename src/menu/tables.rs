//! Static lookup tables for the sidebar.
//!
//! Category, icon and path are data keyed by module key. The builder only
//! reads them; extending the sidebar means adding rows here.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Dashboard,
    Content,
    Donation,
    Application,
    System,
}

impl MenuCategory {
    /// Sections emitted after the synthetic dashboard section, in order
    pub const SECTION_ORDER: [MenuCategory; 4] = [
        MenuCategory::Content,
        MenuCategory::Donation,
        MenuCategory::Application,
        MenuCategory::System,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            MenuCategory::Dashboard => "Dashboard",
            MenuCategory::Content => "İçerik Yönetimi",
            MenuCategory::Donation => "Bağış Yönetimi",
            MenuCategory::Application => "Başvuru Yönetimi",
            MenuCategory::System => "Sistem Yönetimi",
        }
    }
}

pub const DEFAULT_ICON: &str = "circle";
pub const DASHBOARD_KEY: &str = "dashboard";
pub const DASHBOARD_TITLE: &str = "Dashboard";
pub const DASHBOARD_PATH: &str = "/dashboard";

const CATEGORY_ROWS: &[(&str, MenuCategory)] = &[
    ("dashboard", MenuCategory::Dashboard),
    ("projects", MenuCategory::Content),
    ("news", MenuCategory::Content),
    ("gallery", MenuCategory::Content),
    ("timeline", MenuCategory::Content),
    ("team-members", MenuCategory::Content),
    ("campaigns", MenuCategory::Donation),
    ("campaign-settings", MenuCategory::Donation),
    ("donations", MenuCategory::Donation),
    ("donations-list", MenuCategory::Donation),
    ("recurring-donations", MenuCategory::Donation),
    ("payment-transactions", MenuCategory::Donation),
    ("bank-accounts", MenuCategory::Donation),
    ("contact", MenuCategory::Application),
    ("volunteers", MenuCategory::Application),
    ("careers", MenuCategory::Application),
    ("users", MenuCategory::System),
    ("roles", MenuCategory::System),
    ("modules", MenuCategory::System),
    ("settings", MenuCategory::System),
    ("system-settings", MenuCategory::System),
];

const ICON_ROWS: &[(&str, &str)] = &[
    ("dashboard", "home"),
    ("projects", "folder"),
    ("news", "news"),
    ("gallery", "photo"),
    ("timeline", "timeline"),
    ("team-members", "users-group"),
    ("pages", "file-text"),
    ("campaigns", "flag"),
    ("campaign-settings", "adjustments"),
    ("donations", "heart"),
    ("donations-list", "list"),
    ("recurring-donations", "repeat"),
    ("payment-transactions", "credit-card"),
    ("bank-accounts", "building-bank"),
    ("contact", "mail"),
    ("volunteers", "hand-stop"),
    ("careers", "briefcase"),
    ("users", "user"),
    ("roles", "shield"),
    ("modules", "puzzle"),
    ("settings", "settings"),
    ("system-settings", "tool"),
];

const PATH_ROWS: &[(&str, &str)] = &[
    ("dashboard", "/dashboard"),
    ("projects", "/admin/projects"),
    ("news", "/admin/news"),
    ("gallery", "/admin/gallery"),
    ("timeline", "/admin/timeline"),
    ("team-members", "/admin/team"),
    ("pages", "/admin/pages"),
    ("campaigns", "/admin/campaigns"),
    ("campaign-settings", "/admin/campaigns/settings"),
    ("donations", "/admin/donations"),
    ("donations-list", "/admin/donations/list"),
    ("recurring-donations", "/admin/donations/recurring"),
    ("payment-transactions", "/admin/payments"),
    ("bank-accounts", "/admin/bank-accounts"),
    ("contact", "/admin/contact"),
    ("volunteers", "/admin/volunteers"),
    ("careers", "/admin/careers"),
    ("users", "/admin/users"),
    ("roles", "/admin/roles"),
    ("modules", "/admin/modules"),
    ("settings", "/admin/settings"),
    ("system-settings", "/admin/settings/system"),
];

static CATEGORIES: Lazy<HashMap<&'static str, MenuCategory>> = Lazy::new(|| CATEGORY_ROWS.iter().copied().collect());
static ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| ICON_ROWS.iter().copied().collect());
static PATHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| PATH_ROWS.iter().copied().collect());

/// Unknown keys land in the system section
pub fn category_for(module_key: &str) -> MenuCategory {
    CATEGORIES.get(module_key).copied().unwrap_or(MenuCategory::System)
}

pub fn icon_for(module_key: &str) -> &'static str {
    ICONS.get(module_key).copied().unwrap_or(DEFAULT_ICON)
}

/// Unknown keys get `/admin/{module_key}`
pub fn path_for(module_key: &str) -> String {
    PATHS
        .get(module_key)
        .map(|p| p.to_string())
        .unwrap_or_else(|| format!("/admin/{}", module_key))
}
