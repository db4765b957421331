//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Gemini model client and a scripted mock
//! - `storage` - Concept session persistence (file, in-memory)
//! - `web` - Website fetching for partner extraction
//! - `http` - axum REST API

pub mod ai;
pub mod http;
pub mod storage;
pub mod web;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider};
pub use storage::{FileStateStorage, InMemoryStateStorage};
pub use web::HttpWebFetcher;
