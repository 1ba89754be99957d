//! Hardcoded default sidebar, used when the module list is unavailable.

use std::collections::HashMap;

use crate::auth::{can_access, CurrentUser};
use crate::menu::builder::{assemble_sections, MenuItem, MenuSection};
use crate::menu::tables::MenuCategory;
use crate::types::Action;

struct StaticItem {
    title: &'static str,
    module_key: &'static str,
    children: &'static [StaticItem],
}

const fn leaf(title: &'static str, module_key: &'static str) -> StaticItem {
    StaticItem {
        title,
        module_key,
        children: &[],
    }
}

const DEFAULT_MENU: &[(MenuCategory, &[StaticItem])] = &[
    (
        MenuCategory::Content,
        &[
            leaf("Projeler", "projects"),
            leaf("Haberler", "news"),
            leaf("Galeri", "gallery"),
            leaf("Zaman Çizelgesi", "timeline"),
            leaf("Ekip Üyeleri", "team-members"),
        ],
    ),
    (
        MenuCategory::Donation,
        &[
            StaticItem {
                title: "Kampanyalar",
                module_key: "campaigns",
                children: &[leaf("Kampanya Ayarları", "campaign-settings")],
            },
            StaticItem {
                title: "Bağışlar",
                module_key: "donations",
                children: &[
                    leaf("Bağış Listesi", "donations-list"),
                    leaf("Düzenli Bağışlar", "recurring-donations"),
                ],
            },
            leaf("Ödeme İşlemleri", "payment-transactions"),
            leaf("Banka Hesapları", "bank-accounts"),
        ],
    ),
    (
        MenuCategory::Application,
        &[
            leaf("İletişim", "contact"),
            leaf("Gönüllüler", "volunteers"),
            leaf("Kariyer", "careers"),
        ],
    ),
    (
        MenuCategory::System,
        &[
            leaf("Kullanıcılar", "users"),
            leaf("Roller", "roles"),
            leaf("Modüller", "modules"),
            StaticItem {
                title: "Ayarlar",
                module_key: "settings",
                children: &[leaf("Sistem Ayarları", "system-settings")],
            },
        ],
    ),
];

fn visible(user: &CurrentUser, module_key: &str) -> bool {
    user.is_super_admin() || can_access(Some(user), module_key, Action::Read)
}

fn filter_item(user: &CurrentUser, item: &StaticItem) -> Option<MenuItem> {
    if !visible(user, item.module_key) {
        return None;
    }

    let children = item
        .children
        .iter()
        .filter_map(|child| filter_item(user, child))
        .collect();

    Some(MenuItem::with_children(item.title, item.module_key, children))
}

/// The static default menu, filtered by the same read rule as the dynamic one
pub fn fallback_menu(user: Option<&CurrentUser>) -> Vec<MenuSection> {
    let Some(user) = user else {
        return Vec::new();
    };

    let grouped: HashMap<MenuCategory, Vec<MenuItem>> = DEFAULT_MENU
        .iter()
        .map(|(category, items)| {
            let items = items.iter().filter_map(|item| filter_item(user, item)).collect();
            (*category, items)
        })
        .collect();

    assemble_sections(grouped)
}
