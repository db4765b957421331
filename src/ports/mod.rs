//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Text generation model
//! - `StateStorage` - Persistence of concept sessions
//! - `WebFetcher` - Retrieval of partner websites

mod ai_provider;
mod state_storage;
mod web_fetcher;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, DEFAULT_MAX_TOKENS,
};
pub use state_storage::{StateStorage, StateStorageError};
pub use web_fetcher::{normalize_url, FetchError, FetchedPage, WebFetcher, MAX_PAGE_CHARS};
