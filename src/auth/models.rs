use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Action;

/// Role name that bypasses every per-module check
pub const SUPERADMIN_ROLE: &str = "superadmin";

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Answer of `POST /auth/login`.
///
/// The embedded `user` is kept for logging only; permissions always come
/// from `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDto {
    pub module_key: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub delete: bool,
}

/// Raw `GET /auth/me` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<RoleDto>,
    #[serde(default)]
    pub permissions: Option<Vec<PermissionDto>>,
}

/// Backend-defined navigation/permission unit (`GET /modules`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i64,
    pub name: String,
    pub module_key: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// Capabilities a user holds on one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grants {
    pub read: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Grants {
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

impl From<&PermissionDto> for Grants {
    fn from(dto: &PermissionDto) -> Self {
        Self {
            read: dto.read,
            create: dto.create,
            update: dto.update,
            delete: dto.delete,
        }
    }
}

/// Permission list keyed by module key, at most one entry per key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PermissionSet {
    entries: HashMap<String, Grants>,
}

impl PermissionSet {
    pub fn from_dtos(dtos: &[PermissionDto]) -> Self {
        let mut entries = HashMap::with_capacity(dtos.len());
        for dto in dtos {
            if entries.contains_key(&dto.module_key) {
                tracing::warn!(module_key = %dto.module_key, "duplicate permission entry ignored");
                continue;
            }
            entries.insert(dto.module_key.clone(), Grants::from(dto));
        }
        Self { entries }
    }

    pub fn get(&self, module_key: &str) -> Option<&Grants> {
        self.entries.get(module_key)
    }

    pub fn allows(&self, module_key: &str, action: Action) -> bool {
        self.get(module_key).map(|g| g.allows(action)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Module keys sorted for stable output
    pub fn module_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Access resolved once when the identity is normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "permissions", rename_all = "snake_case")]
pub enum Access {
    SuperAdmin,
    Standard(PermissionSet),
}

impl Access {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Access::SuperAdmin)
    }
}

/// Whether a role name designates the superadmin bypass
pub fn is_superadmin_role(name: &str) -> bool {
    name.eq_ignore_ascii_case(SUPERADMIN_ROLE)
}

/// The authenticated identity held by the session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub access: Access,
}

impl CurrentUser {
    pub fn is_super_admin(&self) -> bool {
        self.access.is_super_admin()
    }

    /// Name for greetings and status output
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

impl From<UserDto> for CurrentUser {
    fn from(dto: UserDto) -> Self {
        let role = dto
            .role
            .map(|r| Role { id: r.id, name: r.name })
            .unwrap_or(Role { id: 0, name: String::new() });

        let access = if is_superadmin_role(&role.name) {
            Access::SuperAdmin
        } else {
            Access::Standard(PermissionSet::from_dtos(dto.permissions.as_deref().unwrap_or(&[])))
        };

        Self {
            id: dto.id,
            email: dto.email,
            display_name: dto.display_name,
            role,
            access,
        }
    }
}
