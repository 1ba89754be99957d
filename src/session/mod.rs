pub mod storage;
pub mod store;

pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};
pub use store::{SessionRoutes, SessionState, SessionStore};
