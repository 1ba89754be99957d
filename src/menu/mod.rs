//! Sidebar navigation derived from the backend module list and the current
//! user's permissions.

pub mod builder;
pub mod fallback;
pub mod tables;

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::api::AdminBackend;
use crate::auth::CurrentUser;
use crate::error::AccessError;
use crate::session::SessionState;

pub use builder::{build_menu, dashboard_section, MenuItem, MenuItemKind, MenuSection};
pub use fallback::fallback_menu;
pub use tables::MenuCategory;

/// What the sidebar shows for a session snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "sections", rename_all = "snake_case")]
pub enum MenuView {
    Loading,
    Ready(Vec<MenuSection>),
}

/// Fetches the module list and derives the sidebar.
///
/// Failures never surface to the user: a failed or empty fetch degrades to
/// the static default menu under the same permission rule.
pub struct MenuService {
    backend: Arc<dyn AdminBackend>,
    fallback_enabled: bool,
}

impl MenuService {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self {
            backend,
            fallback_enabled: true,
        }
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Re-derive the sidebar for a session snapshot; call on every identity change
    pub async fn view(&self, session: &SessionState) -> MenuView {
        match session {
            SessionState::Loading => MenuView::Loading,
            SessionState::Anonymous => MenuView::Ready(Vec::new()),
            SessionState::Authenticated(user) => MenuView::Ready(self.load(Some(user.as_ref())).await),
        }
    }

    pub async fn load(&self, user: Option<&CurrentUser>) -> Vec<MenuSection> {
        let Some(user) = user else {
            return Vec::new();
        };

        match self.backend.list_modules().await {
            Ok(modules) if !modules.is_empty() => build_menu(Some(user), &modules),
            Ok(_) => {
                warn!("Module list is empty, using default menu");
                self.degraded(user)
            }
            Err(e) => {
                warn!("{}, using default menu", AccessError::ModuleListFetchFailed(e));
                self.degraded(user)
            }
        }
    }

    fn degraded(&self, user: &CurrentUser) -> Vec<MenuSection> {
        if self.fallback_enabled {
            fallback_menu(Some(user))
        } else {
            vec![dashboard_section()]
        }
    }
}
