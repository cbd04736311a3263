//! # Response Stores
//!
//! This module contains the response store implementations.

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::provider::ResponseStore;

// Store interface
pub mod provider;

// Individual store implementations
pub mod file;
pub mod memory;
