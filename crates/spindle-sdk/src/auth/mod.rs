//! Authentication for the Spindle client
//!
//! - Token persistence behind a key-value [`TokenStorage`] interface
//! - Single-flight refresh coordination around authorization failures
//! - Observable session state for UI layers

pub mod refresh;
pub mod session;
pub mod storage;

pub use refresh::RefreshError;
pub use session::SessionState;
pub use storage::{
    FileTokenStore, MemoryTokenStore, StorageError, TokenPair, TokenStorage, TokenStore,
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
