use async_trait::async_trait;

use crate::auth::{Credentials, LoginResponse, Module, UserDto};
use crate::error::ApiError;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const CURRENT_USER_ENDPOINT: &str = "/auth/me";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const MODULES_ENDPOINT: &str = "/modules";

/// The backend calls the access-control core depends on
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `GET /auth/me`
    async fn current_user(&self) -> Result<UserDto, ApiError>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /modules`
    async fn list_modules(&self) -> Result<Vec<Module>, ApiError>;
}
