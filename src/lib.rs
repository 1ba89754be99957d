pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod menu;
pub mod navigation;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod testing;
