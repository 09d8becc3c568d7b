//! Local persistence: per-identity visited sets and the simulated login.

pub mod error;
pub mod identity;
pub mod kv;
pub mod session;
pub mod visited;

pub use error::StoreError;
pub use identity::Identity;
pub use kv::{FileStore, KeyValueStore, MemoryStore, STORE_FILE_NAME};
pub use session::{current_identity, login, logout, CURRENT_USER_KEY};
pub use visited::{toggle_visited, VisitedSet};
