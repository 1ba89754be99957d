//! Navigation and notification seams.
//!
//! The session store and the route guard never talk to a router or a toast
//! widget directly; they go through these traits so hosts (browser shell,
//! CLI, tests) can plug in their own.

use serde::Serialize;

/// Where to go and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Navigation {
    /// In-app route transition; in-memory state survives
    Client(String),
    /// Full page load; all in-memory state is discarded
    Full(String),
}

impl Navigation {
    pub fn path(&self) -> &str {
        match self {
            Navigation::Client(path) | Navigation::Full(path) => path,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Navigation::Full(_))
    }
}

/// Transient, non-blocking user notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    LoginRequired,
    AccessDenied { module_key: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::LoginRequired => write!(f, "Please log in to continue"),
            Notice::AccessDenied { module_key } => {
                write!(f, "You do not have access to module '{}'", module_key)
            }
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, target: Navigation);
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
