//! In-memory doubles for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::api::AdminBackend;
use crate::auth::{Credentials, CurrentUser, LoginResponse, Module, PermissionDto, RoleDto, UserDto};
use crate::error::ApiError;
use crate::guard::Clock;
use crate::navigation::{Navigation, Navigator, Notice, Notifier};

/// `(module_key, read, create, update, delete)`
pub type GrantRow<'a> = (&'a str, bool, bool, bool, bool);

pub fn permission_dtos(rows: &[GrantRow<'_>]) -> Vec<PermissionDto> {
    rows.iter()
        .map(|(key, read, create, update, delete)| PermissionDto {
            module_key: key.to_string(),
            read: *read,
            create: *create,
            update: *update,
            delete: *delete,
        })
        .collect()
}

pub fn standard_user(rows: &[GrantRow<'_>]) -> CurrentUser {
    CurrentUser::from(UserDto {
        id: 7,
        email: "editor@example.org".to_string(),
        display_name: Some("Editor".to_string()),
        role: Some(RoleDto { id: 2, name: "editor".to_string() }),
        permissions: Some(permission_dtos(rows)),
    })
}

pub fn superadmin_user() -> CurrentUser {
    CurrentUser::from(UserDto {
        id: 1,
        email: "root@example.org".to_string(),
        display_name: None,
        role: Some(RoleDto { id: 1, name: "SuperAdmin".to_string() }),
        permissions: Some(Vec::new()),
    })
}

pub fn module(id: i64, module_key: &str, parent_id: Option<i64>, display_order: i32) -> Module {
    Module {
        id,
        name: module_key.to_string(),
        module_key: module_key.to_string(),
        parent_id,
        display_order,
        icon: None,
        path: None,
    }
}

/// Scriptable backend that counts calls per endpoint
#[derive(Default)]
pub struct FakeBackend {
    login_error: Option<ApiError>,
    login_user: Option<Value>,
    user: Option<UserDto>,
    user_error: Option<ApiError>,
    logout_error: Option<ApiError>,
    modules: Option<Vec<Module>>,
    modules_error: Option<ApiError>,
    me_gate: Option<Arc<Notify>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeBackend {
    pub const TOKEN: &'static str = "fake-token";

    pub fn editor_dto() -> UserDto {
        UserDto {
            id: 7,
            email: "editor@example.org".to_string(),
            display_name: Some("Editor".to_string()),
            role: Some(RoleDto { id: 2, name: "editor".to_string() }),
            permissions: Some(permission_dtos(&[
                ("dashboard", true, false, false, false),
                ("news", true, true, false, false),
            ])),
        }
    }

    pub fn with_login_error(mut self, err: ApiError) -> Self {
        self.login_error = Some(err);
        self
    }

    pub fn with_login_user(mut self, user: Value) -> Self {
        self.login_user = Some(user);
        self
    }

    pub fn with_user(mut self, user: UserDto) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_user_error(mut self, err: ApiError) -> Self {
        self.user_error = Some(err);
        self
    }

    pub fn with_logout_error(mut self, err: ApiError) -> Self {
        self.logout_error = Some(err);
        self
    }

    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = Some(modules);
        self
    }

    pub fn with_modules_error(mut self, err: ApiError) -> Self {
        self.modules_error = Some(err);
        self
    }

    /// Hold `current_user` until the gate is notified
    pub fn with_me_gate(mut self, gate: Arc<Notify>) -> Self {
        self.me_gate = Some(gate);
        self
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
    }
}

#[async_trait]
impl AdminBackend for FakeBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record("login");
        if let Some(err) = &self.login_error {
            return Err(err.clone());
        }
        Ok(LoginResponse {
            token: Self::TOKEN.to_string(),
            user: self.login_user.clone(),
        })
    }

    async fn current_user(&self) -> Result<UserDto, ApiError> {
        self.record("me");
        if let Some(gate) = &self.me_gate {
            gate.notified().await;
        }
        if let Some(err) = &self.user_error {
            return Err(err.clone());
        }
        self.user
            .clone()
            .ok_or_else(|| ApiError::Unauthorized("no session".to_string()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        match &self.logout_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn list_modules(&self) -> Result<Vec<Module>, ApiError> {
        self.record("modules");
        if let Some(err) = &self.modules_error {
            return Err(err.clone());
        }
        Ok(self.modules.clone().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: Navigation) {
        self.history.lock().unwrap().push(target);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Records requested delays; returns at once unless gated
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
    gate: Option<Arc<Notify>>,
}

impl RecordingClock {
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            gate: Some(gate),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}
