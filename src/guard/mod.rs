//! Page-access guard.
//!
//! `RouteGuard` is a pure state machine: it turns a session snapshot and a
//! static requirement into a `GuardState` plus a list of effects. Effects
//! are executed separately by `GuardRunner`, which owns the clock, so the
//! denial delay can be driven deterministically in tests.

pub mod runner;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::auth::{can_access, CurrentUser};
use crate::config::{config, AppConfig};
use crate::navigation::{Navigation, Notice};
use crate::session::SessionState;
use crate::types::Action;

pub use runner::{Clock, GuardRunner, TokioClock};

pub const DEFAULT_REDIRECT: &str = "/dashboard";

/// Static declaration a page is wrapped with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardRequirement {
    pub module_key: String,
    pub action: Action,
    pub redirect_to: String,
}

impl GuardRequirement {
    /// Read access, redirecting denied users to `ADMIN_DEFAULT_REDIRECT`
    pub fn new(module_key: impl Into<String>) -> Self {
        Self {
            module_key: module_key.into(),
            action: Action::Read,
            redirect_to: config().guard.default_redirect.clone(),
        }
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSettings {
    pub login_path: String,
    /// How long the denial notice stays up before redirecting
    pub denial_delay: Duration,
}

impl GuardSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            login_path: config.session.login_path.clone(),
            denial_delay: config.guard.denial_delay(),
        }
    }
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            denial_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    Checking,
    Allowed,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    Notify(Notice),
    Navigate { to: Navigation, after: Duration },
}

/// Everything a decision depends on; a change in any of these re-evaluates
#[derive(Debug, Clone)]
struct GuardInputs {
    loading: bool,
    user: Option<Arc<CurrentUser>>,
    requirement: GuardRequirement,
}

impl GuardInputs {
    fn capture(session: &SessionState, requirement: &GuardRequirement) -> Self {
        Self {
            loading: session.is_loading(),
            user: session.user().cloned(),
            requirement: requirement.clone(),
        }
    }

    fn same_as(&self, other: &GuardInputs) -> bool {
        let same_user = match (&self.user, &other.user) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_user && self.loading == other.loading && self.requirement == other.requirement
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    requirement: GuardRequirement,
    settings: GuardSettings,
    state: GuardState,
    last_inputs: Option<GuardInputs>,
}

impl RouteGuard {
    pub fn new(requirement: GuardRequirement, settings: GuardSettings) -> Self {
        Self {
            requirement,
            settings,
            state: GuardState::Checking,
            last_inputs: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn requirement(&self) -> &GuardRequirement {
        &self.requirement
    }

    /// Swap the declaration; the next `observe` re-evaluates
    pub fn set_requirement(&mut self, requirement: GuardRequirement) {
        self.requirement = requirement;
    }

    /// Feed the latest session snapshot. Returns the effects to run, which
    /// is empty when none of the inputs changed since the last call.
    pub fn observe(&mut self, session: &SessionState) -> Vec<GuardEffect> {
        let inputs = GuardInputs::capture(session, &self.requirement);
        if let Some(previous) = &self.last_inputs {
            if previous.same_as(&inputs) {
                return Vec::new();
            }
        }
        self.last_inputs = Some(inputs);

        let (state, effects) = self.evaluate(session);
        tracing::debug!(
            module_key = %self.requirement.module_key,
            action = %self.requirement.action,
            ?state,
            "route guard evaluated"
        );
        self.state = state;
        effects
    }

    fn evaluate(&self, session: &SessionState) -> (GuardState, Vec<GuardEffect>) {
        let user = match session {
            SessionState::Loading => return (GuardState::Checking, Vec::new()),
            SessionState::Anonymous => {
                return (
                    GuardState::Denied,
                    vec![
                        GuardEffect::Notify(Notice::LoginRequired),
                        GuardEffect::Navigate {
                            to: Navigation::Client(self.settings.login_path.clone()),
                            after: Duration::ZERO,
                        },
                    ],
                )
            }
            SessionState::Authenticated(user) => user,
        };

        if can_access(Some(user.as_ref()), &self.requirement.module_key, self.requirement.action) {
            return (GuardState::Allowed, Vec::new());
        }

        (
            GuardState::Denied,
            vec![
                GuardEffect::Notify(Notice::AccessDenied {
                    module_key: self.requirement.module_key.clone(),
                }),
                GuardEffect::Navigate {
                    to: Navigation::Client(self.requirement.redirect_to.clone()),
                    after: self.settings.denial_delay,
                },
            ],
        )
    }
}

/// What a guarded page shows for the current state
#[derive(Debug, PartialEq, Eq)]
pub enum Rendered<'a, P> {
    Loading,
    Page(&'a P),
    Nothing,
}

/// A page wrapped with its access requirement
#[derive(Debug, Clone)]
pub struct GuardedPage<P> {
    page: P,
    guard: RouteGuard,
}

/// Wrap `page` so it only renders for users holding `requirement`
pub fn with_permission<P>(page: P, requirement: GuardRequirement, settings: GuardSettings) -> GuardedPage<P> {
    GuardedPage {
        page,
        guard: RouteGuard::new(requirement, settings),
    }
}

impl<P> GuardedPage<P> {
    pub fn observe(&mut self, session: &SessionState) -> Vec<GuardEffect> {
        self.guard.observe(session)
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn render(&self) -> Rendered<'_, P> {
        match self.guard.state() {
            GuardState::Checking => Rendered::Loading,
            GuardState::Allowed => Rendered::Page(&self.page),
            GuardState::Denied => Rendered::Nothing,
        }
    }
}
