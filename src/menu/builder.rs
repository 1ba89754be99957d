use std::collections::HashMap;

use serde::Serialize;

use crate::auth::{can_access, CurrentUser, Module};
use crate::menu::tables::{
    category_for, icon_for, path_for, MenuCategory, DASHBOARD_KEY, DASHBOARD_PATH, DASHBOARD_TITLE,
};
use crate::types::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    /// Navigable entry
    Link,
    /// Branch holding children; not navigable itself
    Sub,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub title: String,
    pub module_key: String,
    #[serde(rename = "type")]
    pub kind: MenuItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub icon: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn link(title: impl Into<String>, module_key: &str) -> Self {
        Self {
            title: title.into(),
            module_key: module_key.to_string(),
            kind: MenuItemKind::Link,
            path: Some(path_for(module_key)),
            icon: icon_for(module_key).to_string(),
            children: Vec::new(),
        }
    }

    /// A link when `children` is empty, a branch otherwise
    pub fn with_children(title: impl Into<String>, module_key: &str, children: Vec<MenuItem>) -> Self {
        if children.is_empty() {
            return Self::link(title, module_key);
        }

        Self {
            title: title.into(),
            module_key: module_key.to_string(),
            kind: MenuItemKind::Sub,
            path: None,
            icon: icon_for(module_key).to_string(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl MenuSection {
    pub fn new(category: MenuCategory, items: Vec<MenuItem>) -> Self {
        Self {
            title: category.title().to_string(),
            items,
        }
    }
}

/// The always-present first section; not derived from backend data
pub fn dashboard_section() -> MenuSection {
    MenuSection::new(
        MenuCategory::Dashboard,
        vec![MenuItem {
            title: DASHBOARD_TITLE.to_string(),
            module_key: DASHBOARD_KEY.to_string(),
            kind: MenuItemKind::Link,
            path: Some(DASHBOARD_PATH.to_string()),
            icon: icon_for(DASHBOARD_KEY).to_string(),
            children: Vec::new(),
        }],
    )
}

/// Emit the dashboard section, then every non-empty category in fixed order
pub fn assemble_sections(mut grouped: HashMap<MenuCategory, Vec<MenuItem>>) -> Vec<MenuSection> {
    let mut sections = vec![dashboard_section()];
    for category in MenuCategory::SECTION_ORDER {
        match grouped.remove(&category) {
            Some(items) if !items.is_empty() => sections.push(MenuSection::new(category, items)),
            _ => {}
        }
    }
    sections
}

/// Build the sidebar from the flat module list.
///
/// Pure: the same `(user, modules)` always yields the same sections.
pub fn build_menu(user: Option<&CurrentUser>, modules: &[Module]) -> Vec<MenuSection> {
    let Some(user) = user else {
        return Vec::new();
    };

    let allowed = modules
        .iter()
        .filter(|m| user.is_super_admin() || can_access(Some(user), &m.module_key, Action::Read));

    let (mut parents, children): (Vec<&Module>, Vec<&Module>) = allowed.partition(|m| m.parent_id.is_none());

    // Stable: equal display orders keep backend order
    parents.sort_by_key(|m| m.display_order);

    let mut grouped: HashMap<MenuCategory, Vec<MenuItem>> = HashMap::new();
    for parent in parents {
        let mut kids: Vec<&Module> = children
            .iter()
            .copied()
            .filter(|child| child.parent_id == Some(parent.id))
            .collect();
        kids.sort_by_key(|m| m.display_order);

        let kids = kids
            .into_iter()
            .map(|child| MenuItem::link(child.name.clone(), &child.module_key))
            .collect();

        grouped
            .entry(category_for(&parent.module_key))
            .or_default()
            .push(MenuItem::with_children(parent.name.clone(), &parent.module_key, kids));
    }

    assemble_sections(grouped)
}
