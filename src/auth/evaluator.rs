use crate::auth::models::{is_superadmin_role, Access, CurrentUser, PermissionDto};
use crate::error::AccessError;
use crate::types::Action;

/// Can `user` perform `action` on `module_key`?
///
/// - No IO
/// - No panics
/// - Fails closed: no user, no entry, or a false flag all deny
pub fn can_access(user: Option<&CurrentUser>, module_key: &str, action: Action) -> bool {
    let Some(user) = user else {
        return false;
    };

    match &user.access {
        Access::SuperAdmin => true,
        Access::Standard(permissions) => permissions.allows(module_key, action),
    }
}

/// Same decision over the wire shape, before normalization.
///
/// Kept for parity checks against [`can_access`].
pub fn can_access_raw(
    role_name: Option<&str>,
    permissions: Option<&[PermissionDto]>,
    module_key: &str,
    action: Action,
) -> bool {
    if role_name.map(is_superadmin_role).unwrap_or(false) {
        return true;
    }

    permissions
        .unwrap_or(&[])
        .iter()
        .find(|p| p.module_key == module_key)
        .map(|p| match action {
            Action::Read => p.read,
            Action::Create => p.create,
            Action::Update => p.update,
            Action::Delete => p.delete,
        })
        .unwrap_or(false)
}

/// Typed reason behind a [`can_access`] decision
pub fn explain_access(user: Option<&CurrentUser>, module_key: &str, action: Action) -> Result<(), AccessError> {
    if user.is_none() {
        return Err(AccessError::AuthenticationRequired);
    }

    if can_access(user, module_key, action) {
        Ok(())
    } else {
        Err(AccessError::AuthorizationDenied {
            module_key: module_key.to_string(),
            action,
        })
    }
}
