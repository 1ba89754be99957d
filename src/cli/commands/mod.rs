pub mod access;
pub mod auth;
pub mod menu;
pub mod server;
