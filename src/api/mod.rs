pub mod backend;
pub mod client;

pub use backend::AdminBackend;
pub use client::{ApiClient, UnauthorizedHandler};
