//! Persisted session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` is the injected key-value capability (memory or file backed);
//! `store` layers the fixed session keys on top of it. Only the auth manager
//! writes through the store.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::SessionStore;
