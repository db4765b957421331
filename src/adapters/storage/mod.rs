//! Storage Adapters
//!
//! Implementations of the StateStorage port for persisting concept sessions.
//!
//! ## Available Adapters
//!
//! - **FileStateStorage** - Stores each session as a JSON file on disk
//! - **InMemoryStateStorage** - Stores sessions in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileStateStorage, InMemoryStateStorage};
//!
//! let storage = FileStateStorage::new("./data/sessions");
//! let storage = InMemoryStateStorage::new();
//! ```

mod file_state_storage;
mod in_memory_state_storage;

pub use file_state_storage::FileStateStorage;
pub use in_memory_state_storage::InMemoryStateStorage;
