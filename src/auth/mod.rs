//! Identity model and the permission evaluator.

pub mod evaluator;
pub mod models;

pub use evaluator::{can_access, can_access_raw, explain_access};
pub use models::{
    is_superadmin_role, Access, Credentials, CurrentUser, Grants, LoginResponse, Module, PermissionDto,
    PermissionSet, Role, RoleDto, UserDto, SUPERADMIN_ROLE,
};
